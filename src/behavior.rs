//! Scripted NPC motion strategies.
//!
//! A [`Behavior`] owns the displacement it applies: it moves the entity's
//! position directly instead of writing `direction` and `speed`. The value
//! returned from [`Behavior::update`] is the displacement applied this tick,
//! which the character uses to pick its facing and walking animation.

use glam::Vec2;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{
    DEFAULT_PATROL_SPEED, DEFAULT_WANDER_INTERVAL, DEFAULT_WANDER_SPEED,
    WAYPOINT_ARRIVAL_DISTANCE,
};
use crate::entity::Entity;
use crate::geometry::Rect;
use crate::vector_math::{chebyshev_length, normalize_or_zero};

/// Motion strategy attached to a character.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Stands still.
    Idle,
    /// Loops over authored waypoints.
    PathFollow(PathFollow),
    /// Walks in random diagonal headings.
    Wander(Wander),
}

impl Behavior {
    /// Moves `entity` for one tick and returns the displacement applied.
    pub fn update(&mut self, entity: &mut Entity, dt: f32) -> Vec2 {
        match self {
            Self::Idle => Vec2::ZERO,
            Self::PathFollow(path) => path.update(entity, dt),
            Self::Wander(wander) => wander.update(entity, dt),
        }
    }
}

impl From<PathFollow> for Behavior {
    fn from(path: PathFollow) -> Self {
        Self::PathFollow(path)
    }
}

impl From<Wander> for Behavior {
    fn from(wander: Wander) -> Self {
        Self::Wander(wander)
    }
}

/// Patrols a cyclic list of waypoints forever.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollow {
    waypoints: Vec<Vec2>,
    current: usize,
    speed: f32,
}

impl PathFollow {
    /// Patrols `waypoints` in order at `speed` world units per second.
    #[must_use]
    pub const fn new(waypoints: Vec<Vec2>, speed: f32) -> Self {
        Self {
            waypoints,
            current: 0,
            speed,
        }
    }

    /// A patrol at [`DEFAULT_PATROL_SPEED`].
    #[must_use]
    pub const fn with_default_speed(waypoints: Vec<Vec2>) -> Self {
        Self::new(waypoints, DEFAULT_PATROL_SPEED)
    }

    /// The waypoint currently being approached.
    #[must_use]
    pub fn target(&self) -> Option<Vec2> {
        self.waypoints.get(self.current).copied()
    }

    /// Index of the waypoint being approached.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    fn update(&mut self, entity: &mut Entity, dt: f32) -> Vec2 {
        let Some(target) = self.target() else {
            return Vec2::ZERO;
        };
        let offset = target - entity.position;
        let distance = chebyshev_length(offset);

        if distance < WAYPOINT_ARRIVAL_DISTANCE {
            self.current = (self.current + 1) % self.waypoints.len();
            debug!("patrol advancing to waypoint {}", self.current);
            return Vec2::ZERO;
        }

        // Scale by the dominant axis, never stepping past the waypoint.
        let fraction = (self.speed * dt / distance).min(1.0);
        let step = offset * fraction;
        entity.position += step;
        step
    }
}

/// Walks in a random diagonal heading, re-rolled every `interval` seconds.
///
/// When an area is set, leaving it clamps the entity back inside and
/// reflects the heading on the violated axis.
#[derive(Debug, Clone)]
pub struct Wander {
    interval: f32,
    area: Option<Rect>,
    speed: f32,
    elapsed: f32,
    heading: Vec2,
    rng: StdRng,
}

impl Wander {
    /// Creates a wanderer seeded from system entropy.
    #[must_use]
    pub fn new(interval: f32, area: Option<Rect>, speed: f32) -> Self {
        Self::from_rng(interval, area, speed, StdRng::from_entropy())
    }

    /// Creates a wanderer whose headings are reproducible from `seed`.
    #[must_use]
    pub fn seeded(interval: f32, area: Option<Rect>, speed: f32, seed: u64) -> Self {
        Self::from_rng(interval, area, speed, StdRng::seed_from_u64(seed))
    }

    fn from_rng(interval: f32, area: Option<Rect>, speed: f32, mut rng: StdRng) -> Self {
        let heading = random_heading(&mut rng);
        Self {
            interval,
            area,
            speed,
            elapsed: 0.0,
            heading,
            rng,
        }
    }

    /// Current unit heading.
    #[must_use]
    pub const fn heading(&self) -> Vec2 {
        self.heading
    }

    fn update(&mut self, entity: &mut Entity, dt: f32) -> Vec2 {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            self.heading = random_heading(&mut self.rng);
            debug!("wanderer turned to {:?}", self.heading);
        }

        let start = entity.position;
        entity.position += self.heading * self.speed * dt;

        if let Some(area) = self.area {
            let clamped = entity.bounding_box().clamp_within(&area);
            entity.position = clamped.rect.center();
            if clamped.hits.left {
                self.heading.x = -self.heading.x;
            }
            if clamped.hits.right {
                self.heading.x = -self.heading.x;
            }
            if clamped.hits.top {
                self.heading.y = -self.heading.y;
            }
            if clamped.hits.bottom {
                self.heading.y = -self.heading.y;
            }
        }
        entity.position - start
    }
}

impl Default for Wander {
    fn default() -> Self {
        Self::new(DEFAULT_WANDER_INTERVAL, None, DEFAULT_WANDER_SPEED)
    }
}

fn random_heading(rng: &mut StdRng) -> Vec2 {
    let mut sign = || if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let x = sign();
    let y = sign();
    normalize_or_zero(Vec2::new(x, y))
}
