//! World-to-screen offset that keeps a tracked actor centred.
//!
//! Screen position is `world + offset`. The offset centres the viewport on
//! the tracked rectangle and is then clamped so the viewport never shows
//! anything outside the world. On an axis where the world is narrower than
//! the viewport, the world is centred in the viewport instead.

use glam::Vec2;

use crate::geometry::{Rect, WorldBounds};

/// Size of the visible screen area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Visible width.
    pub width: f32,
    /// Visible height.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport of the given size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Computes the offset that centres `tracked` within the viewport.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use tilewalk::{compute_offset, Rect, Viewport, WorldBounds};
///
/// let world = WorldBounds::new(0.0, 0.0, 6400.0, 3200.0).expect("bounds");
/// let viewport = Viewport::new(1280.0, 720.0);
///
/// let near_origin = Rect::from_center(Vec2::new(10.0, 10.0), Vec2::splat(64.0));
/// assert_eq!(compute_offset(&near_origin, &world, viewport), Vec2::ZERO);
///
/// let far_corner = Rect::from_center(Vec2::new(6390.0, 3190.0), Vec2::splat(64.0));
/// assert_eq!(
///     compute_offset(&far_corner, &world, viewport),
///     Vec2::new(-5120.0, -2480.0)
/// );
/// ```
#[must_use]
pub fn compute_offset(tracked: &Rect, bounds: &WorldBounds, viewport: Viewport) -> Vec2 {
    let world = bounds.rect();
    let center = tracked.center();
    Vec2::new(
        clamp_axis(center.x, world.left, world.width, viewport.width),
        clamp_axis(center.y, world.top, world.height, viewport.height),
    )
}

const fn clamp_axis(center: f32, world_start: f32, world_len: f32, view_len: f32) -> f32 {
    if world_len <= view_len {
        return (view_len - world_len) * 0.5 - world_start;
    }
    let centred = view_len * 0.5 - center;
    let min = -(world_start + world_len - view_len);
    let max = -world_start;
    centred.clamp(min, max)
}

/// Holds the viewport and the last computed offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    viewport: Viewport,
    offset: Vec2,
}

impl Camera {
    /// A camera with a zero offset.
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            offset: Vec2::ZERO,
        }
    }

    /// The visible area.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Offset computed by the last [`Camera::track`].
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Recomputes the offset for `tracked`.
    pub fn track(&mut self, tracked: &Rect, bounds: &WorldBounds) {
        self.offset = compute_offset(tracked, bounds, self.viewport);
    }

    /// Converts a world position to screen space.
    #[must_use]
    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        point + self.offset
    }
}
