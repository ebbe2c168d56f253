//! Facing, animation state keys and validated frame sets.
//!
//! Frame sets are keyed by state strings such as `"down"` (walking down) or
//! `"up_idle"` (standing, facing up). A [`FrameSet`] is only constructed once
//! every facing and movement combination has at least one frame, so frame
//! lookups during a tick cannot miss.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::numeric::wrap_phase;

/// Cardinal direction a character is drawn facing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Towards negative `y`.
    Up,
    /// Towards positive `y`.
    #[default]
    Down,
    /// Towards negative `x`.
    Left,
    /// Towards positive `x`.
    Right,
}

impl Facing {
    /// All facings in frame-set order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Derives the facing for `direction`, keeping `current` when it is zero.
    ///
    /// The horizontal axis is checked first and the vertical axis second, so
    /// a diagonal direction faces up or down.
    ///
    /// ```
    /// use glam::Vec2;
    /// use tilewalk::Facing;
    /// assert_eq!(Facing::resolve(Vec2::new(1.0, 0.0), Facing::Down), Facing::Right);
    /// assert_eq!(Facing::resolve(Vec2::new(-1.0, -1.0), Facing::Down), Facing::Up);
    /// assert_eq!(Facing::resolve(Vec2::ZERO, Facing::Left), Facing::Left);
    /// ```
    #[must_use]
    pub const fn resolve(direction: Vec2, current: Self) -> Self {
        let mut facing = current;
        if direction.x != 0.0 {
            facing = if direction.x > 0.0 { Self::Right } else { Self::Left };
        }
        if direction.y != 0.0 {
            facing = if direction.y > 0.0 { Self::Down } else { Self::Up };
        }
        facing
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Animation state: a facing plus whether the character is moving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StateKey {
    /// Direction the sprite is drawn facing.
    pub facing: Facing,
    /// Walking strip when `true`, idle strip otherwise.
    pub moving: bool,
}

impl StateKey {
    /// Pairs a facing with a movement flag.
    #[must_use]
    pub const fn new(facing: Facing, moving: bool) -> Self {
        Self { facing, moving }
    }

    /// Every state a frame set must cover.
    #[must_use]
    pub fn all() -> impl Iterator<Item = Self> {
        Facing::ALL
            .into_iter()
            .flat_map(|facing| [Self::new(facing, true), Self::new(facing, false)])
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.moving {
            write!(f, "{}", self.facing)
        } else {
            write!(f, "{}_idle", self.facing)
        }
    }
}

impl FromStr for StateKey {
    type Err = SceneError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (name, moving) = raw
            .strip_suffix("_idle")
            .map_or((raw, true), |stem| (stem, false));
        Facing::ALL
            .into_iter()
            .find(|facing| facing.as_str() == name)
            .map(|facing| Self::new(facing, moving))
            .ok_or_else(|| SceneError::InvalidStateKey(raw.to_owned()))
    }
}

/// Opaque handle to a renderable frame owned by the asset layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRef(pub u32);

/// A state and the frame currently shown for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pose {
    /// Facing and movement being shown.
    pub state: StateKey,
    /// Frame drawn this tick.
    pub frame: FrameRef,
}

/// Frames for every [`StateKey`] of one sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSet {
    strips: HashMap<StateKey, Vec<FrameRef>>,
}

impl FrameSet {
    /// Builds a frame set from the state-keyed map a frame provider returns.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidStateKey`] for keys that are not state
    /// names and [`SceneError::MissingFrames`] when any state has no frames.
    pub fn from_named(
        sprite: &str,
        named: impl IntoIterator<Item = (String, Vec<FrameRef>)>,
    ) -> Result<Self, SceneError> {
        let mut strips = HashMap::new();
        for (key, frames) in named {
            strips.insert(key.parse::<StateKey>()?, frames);
        }
        for state in StateKey::all() {
            if strips.get(&state).is_none_or(Vec::is_empty) {
                return Err(SceneError::MissingFrames {
                    sprite: sprite.to_owned(),
                    state: state.to_string(),
                });
            }
        }
        Ok(Self { strips })
    }

    /// Numbers frames sequentially, giving every state `frames_per_state`
    /// frames. Handy for headless runs where frames are never drawn.
    #[must_use]
    pub fn sequential(frames_per_state: u32) -> Self {
        Self {
            strips: sequential_strips(frames_per_state).collect(),
        }
    }

    /// Number of frames for `state`.
    #[must_use]
    pub fn len(&self, state: StateKey) -> usize {
        self.strips.get(&state).map_or(0, Vec::len)
    }

    /// Picks the frame for `state` at animation `phase`.
    #[must_use]
    pub fn frame(&self, state: StateKey, phase: f32) -> Option<FrameRef> {
        let strip = self.strips.get(&state)?;
        let index = wrap_phase(phase, strip.len())?;
        strip.get(index).copied()
    }
}

fn sequential_strips(frames_per_state: u32) -> impl Iterator<Item = (StateKey, Vec<FrameRef>)> {
    let per_state = frames_per_state.max(1);
    StateKey::all().zip(0u32..).map(move |(state, slot)| {
        let first = slot * per_state;
        (state, (first..first + per_state).map(FrameRef).collect())
    })
}

/// Source of per-sprite frame maps, implemented by the asset layer.
pub trait FrameLibrary {
    /// Returns the state-keyed frames for `sprite`, if it is known.
    fn frames_for(&self, sprite: &str) -> Option<HashMap<String, Vec<FrameRef>>>;
}

/// Frame library that serves [`FrameSet::sequential`] strips for any sprite.
#[derive(Debug, Clone, Copy)]
pub struct SequentialFrames {
    /// Frames given to every state; zero is treated as one.
    pub frames_per_state: u32,
}

impl FrameLibrary for SequentialFrames {
    fn frames_for(&self, _sprite: &str) -> Option<HashMap<String, Vec<FrameRef>>> {
        Some(
            sequential_strips(self.frames_per_state)
                .map(|(state, frames)| (state.to_string(), frames))
                .collect(),
        )
    }
}

/// Accumulates animation phase at a configurable rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animator {
    phase: f32,
    /// Frames advanced per second.
    pub speed: f32,
}

impl Animator {
    /// Starts at phase zero.
    #[must_use]
    pub const fn new(speed: f32) -> Self {
        Self { phase: 0.0, speed }
    }

    /// Accumulated phase in frames.
    #[must_use]
    pub const fn phase(&self) -> f32 {
        self.phase
    }

    /// Advances the phase by `speed * dt`.
    pub const fn advance(&mut self, dt: f32) {
        self.phase += self.speed * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::walking_down("down", StateKey::new(Facing::Down, true))]
    #[case::idle_up("up_idle", StateKey::new(Facing::Up, false))]
    #[case::idle_left("left_idle", StateKey::new(Facing::Left, false))]
    fn state_keys_parse_and_display(#[case] raw: &str, #[case] expected: StateKey) {
        let parsed: StateKey = raw.parse().expect("valid state key");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), raw);
    }

    #[rstest]
    #[case::unknown("sideways")]
    #[case::bad_suffix("down_walk")]
    #[case::empty("")]
    fn invalid_state_keys_are_rejected(#[case] raw: &str) {
        assert!(matches!(
            raw.parse::<StateKey>(),
            Err(SceneError::InvalidStateKey(_))
        ));
    }

    #[test]
    fn diagonal_direction_prefers_vertical_facing() {
        assert_eq!(
            Facing::resolve(Vec2::new(1.0, 1.0), Facing::Left),
            Facing::Down
        );
    }

    #[test]
    fn frame_set_requires_every_state() {
        let mut named = SequentialFrames { frames_per_state: 2 }
            .frames_for("hero")
            .expect("sequential frames exist");
        named.remove("right_idle");
        let err = FrameSet::from_named("hero", named).expect_err("missing state");
        assert!(
            matches!(err, SceneError::MissingFrames { ref state, .. } if state == "right_idle"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn frame_set_rejects_empty_strips() {
        let mut named = SequentialFrames { frames_per_state: 2 }
            .frames_for("hero")
            .expect("sequential frames exist");
        named.insert("up".to_owned(), Vec::new());
        assert!(FrameSet::from_named("hero", named).is_err());
    }

    #[test]
    fn frame_lookup_wraps_phase() {
        let frames = FrameSet::sequential(3);
        let state = StateKey::new(Facing::Up, true);
        let first = frames.frame(state, 0.0).expect("frame");
        assert_eq!(frames.frame(state, 3.2), Some(first));
        assert_ne!(frames.frame(state, 1.5), Some(first));
        assert_eq!(frames.len(state), 3);
    }

    #[test]
    fn sequential_library_matches_sequential_set() {
        let named = SequentialFrames { frames_per_state: 4 }
            .frames_for("anyone")
            .expect("sequential frames exist");
        let built = FrameSet::from_named("anyone", named).expect("complete set");
        assert_eq!(built, FrameSet::sequential(4));
    }
}
