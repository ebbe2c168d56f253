//! Player input snapshots, gait selection and scene actions.
//!
//! Input is captured once per frame by the caller (the Bevy plugin reads the
//! keyboard) and handed to the scene, which forwards it to the active
//! character only.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::Tuning;

/// Pressed state of the movement and modifier keys for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "This struct mirrors the pressed state of individual keys."
)]
pub struct InputState {
    /// Whether the "up" key (W) is pressed.
    pub up: bool,
    /// Whether the "down" key (S) is pressed.
    pub down: bool,
    /// Whether the "left" key (A) is pressed.
    pub left: bool,
    /// Whether the "right" key (D) is pressed.
    pub right: bool,
    /// Left shift: sprint, or super sprint together with `boost`.
    pub left_shift: bool,
    /// Right shift: sprint.
    pub right_shift: bool,
    /// Space: upgrades a left-shift sprint to a super sprint.
    pub boost: bool,
}

impl InputState {
    /// Computes a normalised movement direction in screen coordinates.
    ///
    /// Up is negative `y`. Opposing keys cancel and diagonals are
    /// normalised.
    ///
    /// ```
    /// use tilewalk::InputState;
    ///
    /// let input = InputState { up: true, ..Default::default() };
    /// assert_eq!(input.direction(), glam::Vec2::new(0.0, -1.0));
    ///
    /// let diagonal = InputState { up: true, right: true, ..Default::default() };
    /// assert!((diagonal.direction().length() - 1.0).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        /// Maps a negative/positive key pair to an axis value.
        const fn axis(neg: bool, pos: bool) -> f32 {
            match (neg, pos) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            }
        }

        let raw = Vec2::new(axis(self.left, self.right), axis(self.up, self.down));
        if raw == Vec2::ZERO {
            Vec2::ZERO
        } else {
            raw.normalize()
        }
    }

    /// Picks the gait from the modifier keys.
    #[must_use]
    pub const fn gait(&self) -> Gait {
        if self.left_shift && self.boost {
            Gait::SuperSprint
        } else if self.left_shift || self.right_shift {
            Gait::Sprint
        } else {
            Gait::Walk
        }
    }
}

/// Movement tier selected by the modifier keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gait {
    /// No modifier held.
    #[default]
    Walk,
    /// Either shift key held.
    Sprint,
    /// Left shift and the boost key held together.
    SuperSprint,
}

impl Gait {
    /// Looks up the speed and animation rate for this gait.
    #[must_use]
    pub const fn profile(self, tuning: &Tuning) -> GaitProfile {
        match self {
            Self::Walk => tuning.walk,
            Self::Sprint => tuning.sprint,
            Self::SuperSprint => tuning.super_sprint,
        }
    }
}

/// Movement speed paired with the animation rate that matches it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaitProfile {
    /// World units per second.
    pub speed: f32,
    /// Animation frames per second.
    pub animation_speed: f32,
}

/// Discrete, edge-triggered commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneAction {
    /// Show the nearest character's current line.
    Interact,
    /// Advance the nearest character's dialog and show the new line.
    CycleDialog,
    /// Toggle whether the nearest character follows the active one.
    ToggleFollow,
    /// Remove every speech bubble.
    ClearBubble,
    /// Hand control to the character in the given party slot (0-based).
    SwitchCharacter(usize),
    /// Restore the scene to its initial snapshot.
    Restart,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::no_keys(InputState::default(), Vec2::ZERO)]
    #[case::up_only(InputState { up: true, ..Default::default() }, Vec2::new(0.0, -1.0))]
    #[case::down_only(InputState { down: true, ..Default::default() }, Vec2::new(0.0, 1.0))]
    #[case::left_only(InputState { left: true, ..Default::default() }, Vec2::new(-1.0, 0.0))]
    #[case::right_only(InputState { right: true, ..Default::default() }, Vec2::new(1.0, 0.0))]
    #[case::up_and_down(InputState { up: true, down: true, ..Default::default() }, Vec2::ZERO)]
    fn direction_cardinal(#[case] input: InputState, #[case] expected: Vec2) {
        let actual = input.direction();
        assert!(
            (actual - expected).length() < 0.001,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[rstest]
    #[case::walk(InputState::default(), Gait::Walk)]
    #[case::left_sprint(InputState { left_shift: true, ..Default::default() }, Gait::Sprint)]
    #[case::right_sprint(InputState { right_shift: true, ..Default::default() }, Gait::Sprint)]
    #[case::boost_alone(InputState { boost: true, ..Default::default() }, Gait::Walk)]
    #[case::right_shift_boost(
        InputState { right_shift: true, boost: true, ..Default::default() },
        Gait::Sprint
    )]
    #[case::super_sprint(
        InputState { left_shift: true, boost: true, ..Default::default() },
        Gait::SuperSprint
    )]
    fn gait_from_modifiers(#[case] input: InputState, #[case] expected: Gait) {
        assert_eq!(input.gait(), expected);
    }

    #[test]
    fn default_profiles_scale_speed_and_animation_together() {
        let tuning = Tuning::default();
        let walk = Gait::Walk.profile(&tuning);
        let sprint = Gait::Sprint.profile(&tuning);
        let super_sprint = Gait::SuperSprint.profile(&tuning);
        assert!(walk.speed < sprint.speed && sprint.speed < super_sprint.speed);
        assert!(walk.animation_speed < sprint.animation_speed);
        assert!(sprint.animation_speed < super_sprint.animation_speed);
    }
}
