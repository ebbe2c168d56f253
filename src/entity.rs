//! Moving sprites: position, bounded integration, facing and animation.
//!
//! An [`Entity`] integrates `direction * speed * dt` at most once per tick
//! and clamps its bounding box into the world afterwards. Other entities
//! that trail behind it are referenced by [`EntityId`] handles; the scene
//! registry owns every entity.

use std::fmt;
use std::sync::Arc;

use glam::Vec2;

use crate::animation::{Animator, Facing, FrameSet, Pose, StateKey};
use crate::constants::{DEFAULT_TRAIL_DISTANCE, SPRITE_SIZE, WALK_ANIMATION_SPEED, WALK_SPEED};
use crate::geometry::{Rect, WorldBounds};
use crate::vector_math::normalize_or_zero;

/// Non-owning handle to an entity held by the scene registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl EntityId {
    /// Position of the entity in the scene registry.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A sprite that walks around the world.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Centre of the bounding box.
    pub position: Vec2,
    /// Unit or zero vector set by input, seeking or trailing.
    pub direction: Vec2,
    /// World units per second.
    pub speed: f32,
    /// Gap kept by anything following this entity.
    pub trail_distance: f32,
    size: Vec2,
    facing: Facing,
    animator: Animator,
    frames: Arc<FrameSet>,
    pose: Pose,
    followers: Vec<EntityId>,
    integrated: bool,
}

impl Entity {
    /// Creates an idle entity facing down with walking speed.
    #[must_use]
    pub fn new(position: Vec2, frames: Arc<FrameSet>) -> Self {
        let state = StateKey::new(Facing::default(), false);
        let pose = Pose {
            state,
            frame: frames.frame(state, 0.0).unwrap_or_default(),
        };
        Self {
            position,
            direction: Vec2::ZERO,
            speed: WALK_SPEED,
            trail_distance: DEFAULT_TRAIL_DISTANCE,
            size: SPRITE_SIZE,
            facing: Facing::default(),
            animator: Animator::new(WALK_ANIMATION_SPEED),
            frames,
            pose,
            followers: Vec::new(),
            integrated: false,
        }
    }

    /// Overrides the sprite size used for the bounding box.
    #[must_use]
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    /// Sprite-sized box centred on `position`.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        Rect::from_center(self.position, self.size)
    }

    /// Direction of the last movement.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// The state and frame chosen by the last animation step.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    /// Animation frames advanced per second.
    #[must_use]
    pub const fn animation_speed(&self) -> f32 {
        self.animator.speed
    }

    /// Changes the animation rate, usually alongside `speed`.
    pub const fn set_animation_speed(&mut self, speed: f32) {
        self.animator.speed = speed;
    }

    /// Entities trailing behind this one, in insertion order.
    #[must_use]
    pub fn followers(&self) -> &[EntityId] {
        &self.followers
    }

    /// Appends a trailing follower; duplicates are ignored.
    pub fn add_follower(&mut self, follower: EntityId) {
        if !self.followers.contains(&follower) {
            self.followers.push(follower);
        }
    }

    /// Drops `follower` from the trailing list if present.
    pub fn remove_follower(&mut self, follower: EntityId) {
        self.followers.retain(|id| *id != follower);
    }

    /// Clears the once-per-tick integration guard.
    pub const fn begin_tick(&mut self) {
        self.integrated = false;
    }

    /// Integrates `direction * speed * dt` and clamps into `bounds`.
    ///
    /// Only the first call per tick moves the entity; later calls still
    /// re-apply the clamp.
    pub fn integrate(&mut self, dt: f32, bounds: &WorldBounds) {
        if !self.integrated {
            self.position += self.direction * self.speed * dt;
            self.integrated = true;
        }
        self.clamp_to(bounds);
    }

    /// Translates the bounding box back inside `bounds`, edge by edge.
    pub fn clamp_to(&mut self, bounds: &WorldBounds) {
        self.position = bounds.clamp(&self.bounding_box()).center();
    }

    /// Advances the animation phase and recomputes the pose.
    ///
    /// `motion` decides facing and whether the walking strip is shown;
    /// callers pass `direction` or, for scripted motion, the displacement.
    pub fn animate(&mut self, dt: f32, motion: Vec2) {
        let moving = motion.length_squared() > 0.0;
        if moving {
            self.facing = Facing::resolve(motion, self.facing);
        }
        self.animator.advance(dt);
        let state = StateKey::new(self.facing, moving);
        let frame = self
            .frames
            .frame(state, self.animator.phase())
            .unwrap_or(self.pose.frame);
        self.pose = Pose { state, frame };
    }

    /// Copies another entity's pose so this one mimics it this frame.
    pub const fn mirror(&mut self, pose: Pose) {
        self.facing = pose.state.facing;
        self.pose = pose;
    }

    /// Moves this entity towards `anchor` when farther than its own trail
    /// distance, otherwise stops it.
    pub fn trail(&mut self, anchor: Vec2, dt: f32, bounds: &WorldBounds) {
        let offset = anchor - self.position;
        if offset.length() > self.trail_distance {
            self.direction = normalize_or_zero(offset);
            self.integrate(dt, bounds);
        } else {
            self.direction = Vec2::ZERO;
        }
    }

    /// Integrates movement and animates from `direction`.
    pub fn update(&mut self, dt: f32, bounds: &WorldBounds) {
        self.integrate(dt, bounds);
        self.animate(dt, self.direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn bounds() -> WorldBounds {
        WorldBounds::new(0.0, 0.0, 1000.0, 500.0).expect("valid bounds")
    }

    fn entity_at(position: Vec2) -> Entity {
        Entity::new(position, Arc::new(FrameSet::sequential(4)))
    }

    #[rstest]
    fn integrates_direction_times_speed(bounds: WorldBounds) {
        let mut entity = entity_at(Vec2::new(500.0, 250.0));
        entity.direction = Vec2::X;
        entity.speed = 100.0;
        entity.update(0.5, &bounds);
        assert_relative_eq!(entity.position.x, 550.0);
        assert_relative_eq!(entity.position.y, 250.0);
    }

    #[rstest]
    #[case::top_left(Vec2::new(-1.0, -1.0))]
    #[case::bottom_right(Vec2::new(1.0, 1.0))]
    #[case::left(Vec2::new(-1.0, 0.0))]
    #[case::down(Vec2::new(0.0, 1.0))]
    fn clamps_bounding_box_into_world(bounds: WorldBounds, #[case] direction: Vec2) {
        let mut entity = entity_at(Vec2::new(40.0, 460.0));
        entity.direction = normalize_or_zero(direction);
        entity.speed = 10_000.0;
        entity.update(1.0, &bounds);

        let bounding_box = entity.bounding_box();
        let world = bounds.rect();
        assert!(bounding_box.left >= world.left);
        assert!(bounding_box.right() <= world.right());
        assert!(bounding_box.top >= world.top);
        assert!(bounding_box.bottom() <= world.bottom());
    }

    #[rstest]
    fn integrates_once_per_tick(bounds: WorldBounds) {
        let mut entity = entity_at(Vec2::new(500.0, 250.0));
        entity.direction = Vec2::Y;
        entity.speed = 10.0;
        entity.integrate(1.0, &bounds);
        entity.integrate(1.0, &bounds);
        assert_relative_eq!(entity.position.y, 260.0);
        entity.begin_tick();
        entity.integrate(1.0, &bounds);
        assert_relative_eq!(entity.position.y, 270.0);
    }

    #[rstest]
    fn idle_keeps_last_facing(bounds: WorldBounds) {
        let mut entity = entity_at(Vec2::new(500.0, 250.0));
        entity.direction = Vec2::NEG_X;
        entity.update(0.1, &bounds);
        assert_eq!(entity.pose().state, StateKey::new(Facing::Left, true));

        entity.direction = Vec2::ZERO;
        entity.begin_tick();
        entity.update(0.1, &bounds);
        assert_eq!(entity.facing(), Facing::Left);
        assert_eq!(entity.pose().state.to_string(), "left_idle");
    }

    #[rstest]
    fn trailing_entity_closes_gap_then_stops(bounds: WorldBounds) {
        let mut entity = entity_at(Vec2::new(100.0, 100.0));
        entity.trail(Vec2::new(300.0, 100.0), 0.1, &bounds);
        assert_eq!(entity.direction, Vec2::X);
        assert!(entity.position.x > 100.0);

        let mut near = entity_at(Vec2::new(250.0, 100.0));
        near.direction = Vec2::X;
        near.trail(Vec2::new(300.0, 100.0), 0.1, &bounds);
        assert_eq!(near.direction, Vec2::ZERO);
        assert_eq!(near.position, Vec2::new(250.0, 100.0));
    }

    #[test]
    fn followers_are_deduplicated() {
        let mut entity = entity_at(Vec2::ZERO);
        entity.add_follower(EntityId(2));
        entity.add_follower(EntityId(2));
        entity.add_follower(EntityId(3));
        assert_eq!(entity.followers(), &[EntityId(2), EntityId(3)]);
        entity.remove_follower(EntityId(2));
        assert_eq!(entity.followers(), &[EntityId(3)]);
    }
}
