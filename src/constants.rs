//! Movement, timing and camera defaults used across the crate.
//!
//! These seed [`crate::config::Tuning`]; scene files may override any of
//! them.
use std::time::Duration;

use glam::Vec2;

/// Walking speed in world units per second.
pub const WALK_SPEED: f32 = 125.0;
/// Animation frames advanced per second while walking.
pub const WALK_ANIMATION_SPEED: f32 = 6.0;
/// Speed while either shift key is held.
pub const SPRINT_SPEED: f32 = 250.0;
/// Animation frames advanced per second while sprinting.
pub const SPRINT_ANIMATION_SPEED: f32 = 12.0;
/// Speed while left shift and the boost key are held together.
pub const SUPER_SPRINT_SPEED: f32 = 1000.0;
/// Animation frames advanced per second while super sprinting.
pub const SUPER_SPRINT_ANIMATION_SPEED: f32 = 24.0;

/// Gap a follower keeps before it starts closing distance.
pub const DEFAULT_TRAIL_DISTANCE: f32 = 100.0;
/// A seeking character snaps onto its target once closer than this.
pub const SEEK_ARRIVAL_DISTANCE: f32 = 5.0;
/// Chebyshev distance at which a patrol waypoint counts as reached.
pub const WAYPOINT_ARRIVAL_DISTANCE: f32 = 1.0;
/// Characters within this radius of the active character can be talked to.
pub const INTERACT_RANGE: f32 = 150.0;

/// How long a speech bubble stays visible.
pub const BUBBLE_LIFETIME: Duration = Duration::from_millis(5000);
/// Rest between NPC bobs.
pub const BOB_INTERVAL: Duration = Duration::from_millis(5000);
/// Time an NPC stays dipped before rising.
pub const BOB_PAUSE: Duration = Duration::from_millis(500);
/// Vertical dip of an NPC bob.
pub const BOB_DISTANCE: f32 = 5.0;

/// Patrol speed when a path does not name one.
pub const DEFAULT_PATROL_SPEED: f32 = 100.0;
/// Wander speed when a config does not name one.
pub const DEFAULT_WANDER_SPEED: f32 = 100.0;
/// Seconds between wander heading changes.
pub const DEFAULT_WANDER_INTERVAL: f32 = 3.0;

/// Size of every character sprite's bounding box.
pub const SPRITE_SIZE: Vec2 = Vec2::new(64.0, 64.0);

/// Width of the demo world.
pub const WORLD_WIDTH: f32 = 6400.0;
/// Height of the demo world.
pub const WORLD_HEIGHT: f32 = 3200.0;
/// Width of the default viewport.
pub const VIEWPORT_WIDTH: f32 = 1280.0;
/// Height of the default viewport.
pub const VIEWPORT_HEIGHT: f32 = 720.0;

/// Frame hitches longer than this are clamped before stepping the scene.
pub const MAX_DELTA_SECONDS: f32 = 0.1;
