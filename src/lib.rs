#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate for a top-down tile-world exploration core.
//!
//! Characters walk a bounded world under player input, scripted behaviours,
//! seek targets and follow relations, while a camera keeps the active
//! character centred. Re-exports the common types for the binary and tests.
pub mod animation;
pub mod behavior;
pub mod camera;
pub mod character;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod numeric;
pub mod plugin;
pub mod scene;
pub mod vector_math;
pub use constants::*;

pub use animation::{Facing, FrameLibrary, FrameRef, FrameSet, Pose, SequentialFrames, StateKey};
pub use behavior::{Behavior, PathFollow, Wander};
pub use camera::{compute_offset, Camera, Viewport};
pub use character::{Bob, BobPhase, Character, Dialog, LeaderView, Seek, SpeechBubble, TickContext};
pub use config::{BehaviorConfig, CharacterConfig, SceneConfig, Tuning};
pub use entity::{Entity, EntityId};
pub use error::SceneError;
pub use geometry::{Rect, WorldBounds};
pub use input::{Gait, GaitProfile, InputState, SceneAction};
pub use logging::init as init_logging;
pub use plugin::{CameraView, ExplorationPlugin, PlayerInput, SceneState};
pub use scene::{DrawCommand, Scene};
pub use vector_math::{vec_mag, vec_normalize};
