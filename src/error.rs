//! Error type shared by scene construction and configuration loading.
//!
//! Every variant describes a configuration precondition that was violated
//! while building a scene. Per-frame updates never fail: degenerate vectors
//! normalise to zero and empty patrol paths are ignored.

use thiserror::Error;

use crate::entity::EntityId;

/// Errors raised while assembling or reconfiguring a [`crate::Scene`].
#[derive(Debug, Error)]
pub enum SceneError {
    /// World or wander rectangles must have a positive area.
    #[error("bounds must have positive size, got {width}x{height}")]
    InvalidBounds {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
    /// A character was configured without any dialog lines.
    #[error("character `{0}` has no dialog lines")]
    EmptyDialog(String),
    /// A frame set does not cover every facing and movement combination.
    #[error("frame set `{sprite}` has no frames for state `{state}`")]
    MissingFrames {
        /// Sprite identifier passed to the frame library.
        sprite: String,
        /// State key that had no frames.
        state: String,
    },
    /// The frame library knows nothing about the requested sprite.
    #[error("no frame set registered for sprite `{0}`")]
    UnknownSprite(String),
    /// A frame-set key could not be parsed as an animation state.
    #[error("unrecognised animation state `{0}`")]
    InvalidStateKey(String),
    /// A configuration entry referenced a character that does not exist.
    #[error("unknown character `{0}`")]
    UnknownCharacter(String),
    /// A handle did not resolve to an entity in the registry.
    #[error("no entity with id {0}")]
    UnknownEntity(EntityId),
    /// A character was asked to follow itself.
    #[error("entity {0} cannot follow itself")]
    SelfFollow(EntityId),
    /// The scene description contains no characters to control.
    #[error("scene has no characters")]
    EmptyScene,
    /// The scene description could not be parsed.
    #[error("malformed scene config: {0}")]
    Config(#[from] serde_json::Error),
    /// The scene description could not be read.
    #[error("failed to read scene config: {0}")]
    Io(#[from] std::io::Error),
}
