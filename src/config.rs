//! Scene descriptions and tuning loaded from JSON.
//!
//! A [`SceneConfig`] lists the world rectangle, viewport, tuning overrides
//! and every character with its dialog, behaviour and relations. Characters
//! refer to each other by name; names are resolved to [`crate::EntityId`]
//! handles when the scene is built.

use std::fs;
use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, PathFollow, Wander};
use crate::character::Bob;
use crate::constants::{
    BOB_DISTANCE, BOB_INTERVAL, BOB_PAUSE, BUBBLE_LIFETIME, DEFAULT_PATROL_SPEED,
    DEFAULT_TRAIL_DISTANCE, DEFAULT_WANDER_INTERVAL, DEFAULT_WANDER_SPEED, INTERACT_RANGE,
    MAX_DELTA_SECONDS, SEEK_ARRIVAL_DISTANCE, SPRINT_ANIMATION_SPEED, SPRINT_SPEED, SPRITE_SIZE,
    SUPER_SPRINT_ANIMATION_SPEED, SUPER_SPRINT_SPEED, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
    WALK_ANIMATION_SPEED, WALK_SPEED, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::error::SceneError;
use crate::geometry::Rect;
use crate::input::GaitProfile;

/// Runtime tuning for movement, timers and interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Gait with no modifier held.
    pub walk: GaitProfile,
    /// Gait while either shift key is held.
    pub sprint: GaitProfile,
    /// Gait while left shift and boost are held.
    pub super_sprint: GaitProfile,
    /// Default trail distance for every character.
    pub trail_distance: f32,
    /// Distance at which a seeking character snaps onto its target.
    pub seek_arrival_distance: f32,
    /// Reach of interact, cycle-dialog and toggle-follow.
    pub interact_range: f32,
    /// Milliseconds a speech bubble stays visible.
    pub bubble_lifetime_ms: u64,
    /// Milliseconds an NPC rests between bobs.
    pub bob_interval_ms: u64,
    /// Milliseconds an NPC stays dipped.
    pub bob_pause_ms: u64,
    /// Depth of the NPC dip.
    pub bob_distance: f32,
    /// Bounding box of every sprite.
    pub sprite_size: [f32; 2],
    /// Longest frame delta fed into a single scene update.
    pub max_delta_seconds: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            walk: GaitProfile {
                speed: WALK_SPEED,
                animation_speed: WALK_ANIMATION_SPEED,
            },
            sprint: GaitProfile {
                speed: SPRINT_SPEED,
                animation_speed: SPRINT_ANIMATION_SPEED,
            },
            super_sprint: GaitProfile {
                speed: SUPER_SPRINT_SPEED,
                animation_speed: SUPER_SPRINT_ANIMATION_SPEED,
            },
            trail_distance: DEFAULT_TRAIL_DISTANCE,
            seek_arrival_distance: SEEK_ARRIVAL_DISTANCE,
            interact_range: INTERACT_RANGE,
            bubble_lifetime_ms: duration_millis(BUBBLE_LIFETIME),
            bob_interval_ms: duration_millis(BOB_INTERVAL),
            bob_pause_ms: duration_millis(BOB_PAUSE),
            bob_distance: BOB_DISTANCE,
            sprite_size: SPRITE_SIZE.to_array(),
            max_delta_seconds: MAX_DELTA_SECONDS,
        }
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Tuning {
    /// Speech bubble lifetime as a duration.
    #[must_use]
    pub const fn bubble_lifetime(&self) -> Duration {
        Duration::from_millis(self.bubble_lifetime_ms)
    }

    /// A fresh NPC bob using these timings.
    #[must_use]
    pub const fn bob(&self) -> Bob {
        Bob::new(
            Duration::from_millis(self.bob_interval_ms),
            Duration::from_millis(self.bob_pause_ms),
            self.bob_distance,
        )
    }

    /// Sprite size as a vector.
    #[must_use]
    pub const fn sprite_size(&self) -> Vec2 {
        Vec2::from_array(self.sprite_size)
    }

    /// Caps a frame delta to `max_delta_seconds`, treating negative or
    /// non-finite deltas as zero.
    #[must_use]
    pub const fn clamp_delta(&self, dt: f32) -> f32 {
        if !dt.is_finite() {
            return 0.0;
        }
        let max = self.max_delta_seconds.max(f32::EPSILON);
        dt.clamp(0.0, max)
    }
}

/// Scripted motion as written in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorConfig {
    /// Stand still.
    Idle,
    /// Patrol the waypoints in order, looping.
    PathFollow {
        /// Points visited in order.
        waypoints: Vec<[f32; 2]>,
        /// World units per second.
        #[serde(default = "default_patrol_speed")]
        speed: f32,
    },
    /// Walk diagonally, changing heading every `interval` seconds.
    Wander {
        /// Seconds between heading changes.
        #[serde(default = "default_wander_interval")]
        interval: f32,
        /// Optional region the wanderer bounces inside.
        #[serde(default)]
        area: Option<Rect>,
        /// World units per second.
        #[serde(default = "default_wander_speed")]
        speed: f32,
        /// Fixes the random headings for reproducible runs.
        #[serde(default)]
        seed: Option<u64>,
    },
}

const fn default_patrol_speed() -> f32 {
    DEFAULT_PATROL_SPEED
}

const fn default_wander_interval() -> f32 {
    DEFAULT_WANDER_INTERVAL
}

const fn default_wander_speed() -> f32 {
    DEFAULT_WANDER_SPEED
}

impl BehaviorConfig {
    /// Instantiates the behaviour.
    #[must_use]
    pub fn build(&self) -> Behavior {
        match self {
            Self::Idle => Behavior::Idle,
            Self::PathFollow { waypoints, speed } => Behavior::PathFollow(PathFollow::new(
                waypoints.iter().copied().map(Vec2::from_array).collect(),
                *speed,
            )),
            Self::Wander {
                interval,
                area,
                speed,
                seed,
            } => Behavior::Wander(seed.map_or_else(
                || Wander::new(*interval, *area, *speed),
                |fixed| Wander::seeded(*interval, *area, *speed, fixed),
            )),
        }
    }
}

/// One character entry in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterConfig {
    /// Unique name used for relations and party slots.
    pub name: String,
    /// Frame-library identifier; defaults to the character name.
    #[serde(default)]
    pub sprite: Option<String>,
    /// Starting centre in world coordinates.
    pub position: [f32; 2],
    /// Lines cycled through when spoken to; must not be empty.
    pub dialog: Vec<String>,
    /// NPCs bob in place when idle.
    #[serde(default)]
    pub npc: bool,
    /// Scripted motion, if any.
    #[serde(default)]
    pub behavior: Option<BehaviorConfig>,
    /// Name of a character to follow continuously.
    #[serde(default)]
    pub leader: Option<String>,
    /// Names of characters trailing behind this one.
    #[serde(default)]
    pub followers: Vec<String>,
    /// Overrides the tuned trail distance for this character.
    #[serde(default)]
    pub trail_distance: Option<f32>,
}

impl CharacterConfig {
    /// Frame-library identifier for this character.
    #[must_use]
    pub fn sprite(&self) -> &str {
        self.sprite.as_deref().unwrap_or(&self.name)
    }
}

/// A complete scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Playable area.
    pub world: Rect,
    /// Visible width and height.
    #[serde(default = "default_viewport")]
    pub viewport: [f32; 2],
    /// Movement and timer overrides.
    #[serde(default)]
    pub tuning: Tuning,
    /// Every character, in draw order.
    pub characters: Vec<CharacterConfig>,
    /// Switchable characters, in slot order. Defaults to every non-NPC.
    #[serde(default)]
    pub party: Vec<String>,
    /// Initially controlled character. Defaults to the first party member.
    #[serde(default)]
    pub active: Option<String>,
}

const fn default_viewport() -> [f32; 2] {
    [VIEWPORT_WIDTH, VIEWPORT_HEIGHT]
}

impl SceneConfig {
    /// Parses a scene description from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Config`] when the JSON is malformed.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a scene description from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Io`] when the file cannot be read and
    /// [`SceneError::Config`] when it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!(
            "loaded scene {} with {} characters",
            path.display(),
            config.characters.len()
        );
        Ok(config)
    }

    /// The built-in demo: three party members, a patrolling guard, a
    /// wanderer and an elder who bobs in place.
    #[must_use]
    pub fn demo() -> Self {
        let lines = |text: &[&str]| -> Vec<String> {
            text.iter().map(|line| (*line).to_owned()).collect()
        };
        let member = |name: &str, position: [f32; 2], dialog: Vec<String>| CharacterConfig {
            name: name.to_owned(),
            sprite: Some("player".to_owned()),
            position,
            dialog,
            npc: false,
            behavior: None,
            leader: None,
            followers: Vec::new(),
            trail_distance: None,
        };
        let npc = |name: &str, position: [f32; 2], dialog: Vec<String>| CharacterConfig {
            sprite: Some("npc".to_owned()),
            npc: true,
            ..member(name, position, dialog)
        };

        let mut hero = member(
            "hero",
            [3200.0, 1600.0],
            lines(&["Hello there!", "Lovely weather for a walk."]),
        );
        hero.followers.push("scout".to_owned());

        let mut guard = npc(
            "guard",
            [2800.0, 1400.0],
            lines(&["Move along.", "Nothing to see here."]),
        );
        guard.behavior = Some(BehaviorConfig::PathFollow {
            waypoints: vec![
                [2800.0, 1400.0],
                [3000.0, 1400.0],
                [3000.0, 1600.0],
                [2800.0, 1600.0],
            ],
            speed: DEFAULT_PATROL_SPEED,
        });

        let mut wanderer = npc(
            "wanderer",
            [3700.0, 1550.0],
            lines(&["Have you seen my hat?"]),
        );
        wanderer.behavior = Some(BehaviorConfig::Wander {
            interval: DEFAULT_WANDER_INTERVAL,
            area: Some(Rect::new(3400.0, 1300.0, 600.0, 500.0)),
            speed: 80.0,
            seed: None,
        });

        Self {
            world: Rect::new(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT),
            viewport: default_viewport(),
            tuning: Tuning::default(),
            characters: vec![
                hero,
                member("scout", [3100.0, 1650.0], lines(&["I'll keep up."])),
                member("bard", [3300.0, 1700.0], lines(&["Shall I sing?", "La la la."])),
                guard,
                wanderer,
                npc(
                    "elder",
                    [3350.0, 1550.0],
                    lines(&[
                        "Welcome, traveller.",
                        "The guard walks the same square every day.",
                        "Mind the river to the east.",
                    ]),
                ),
            ],
            party: vec!["hero".to_owned(), "scout".to_owned(), "bard".to_owned()],
            active: Some("hero".to_owned()),
        }
    }
}
