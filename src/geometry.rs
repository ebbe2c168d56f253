//! Axis-aligned rectangles and edge clamping.
//!
//! Coordinates follow screen convention: `x` grows to the right and `y`
//! grows downward, so `top < bottom`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Axis-aligned rectangle described by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Creates a rectangle of `size` centred on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let top_left = center - size * 0.5;
        Self::new(top_left.x, top_left.y, size.x, size.y)
    }

    /// Right edge.
    #[must_use]
    pub const fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Top-left corner.
    #[must_use]
    pub const fn top_left(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Width and height as a vector.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Midpoint of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.top_left() + self.size() * 0.5
    }

    /// Returns `true` when the two rectangles overlap with positive area.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Pushes each edge of `self` back inside `area`, edge by edge.
    ///
    /// Edges are tested in the order left, right, top, bottom. The rectangle
    /// is translated, never resized, so a rectangle larger than `area` ends
    /// up aligned with the right and bottom edges.
    #[must_use]
    pub fn clamp_within(&self, area: &Self) -> Clamped {
        let mut rect = *self;
        let mut hits = EdgeHits::default();
        if rect.left < area.left {
            rect.left = area.left;
            hits.left = true;
        }
        if rect.right() > area.right() {
            rect.left = area.right() - rect.width;
            hits.right = true;
        }
        if rect.top < area.top {
            rect.top = area.top;
            hits.top = true;
        }
        if rect.bottom() > area.bottom() {
            rect.top = area.bottom() - rect.height;
            hits.bottom = true;
        }
        Clamped { rect, hits }
    }
}

/// Which edges were violated during a [`Rect::clamp_within`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "One flag per rectangle edge."
)]
pub struct EdgeHits {
    /// The left edge was pulled right.
    pub left: bool,
    /// The right edge was pulled left.
    pub right: bool,
    /// The top edge was pulled down.
    pub top: bool,
    /// The bottom edge was pulled up.
    pub bottom: bool,
}

impl EdgeHits {
    /// Returns `true` when no edge needed clamping.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        !(self.left || self.right || self.top || self.bottom)
    }
}

/// Result of clamping a rectangle into an area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    /// The translated rectangle.
    pub rect: Rect,
    /// Edges that had to be corrected.
    pub hits: EdgeHits,
}

/// The playable area of the world. Width and height are always positive.
///
/// # Examples
///
/// ```
/// use tilewalk::WorldBounds;
/// let bounds = WorldBounds::new(0.0, 0.0, 6400.0, 3200.0).expect("valid bounds");
/// assert_eq!(bounds.rect().right(), 6400.0);
/// assert!(WorldBounds::new(0.0, 0.0, 0.0, 10.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds(Rect);

impl WorldBounds {
    /// Validates and wraps a world rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidBounds`] when either dimension is not a
    /// finite positive number.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Result<Self, SceneError> {
        Self::from_rect(Rect::new(left, top, width, height))
    }

    /// Validates an existing rectangle as world bounds.
    ///
    /// # Errors
    ///
    /// See [`WorldBounds::new`].
    pub fn from_rect(rect: Rect) -> Result<Self, SceneError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        if positive(rect.width) && positive(rect.height) {
            Ok(Self(rect))
        } else {
            Err(SceneError::InvalidBounds {
                width: rect.width,
                height: rect.height,
            })
        }
    }

    /// Borrows the underlying rectangle.
    #[must_use]
    pub const fn rect(&self) -> &Rect {
        &self.0
    }

    /// Clamps a bounding box into the world and returns the corrected box.
    #[must_use]
    pub fn clamp(&self, bounding_box: &Rect) -> Rect {
        bounding_box.clamp_within(&self.0).rect
    }
}
