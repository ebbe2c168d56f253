//! Characters: entities with input, dialog, following and scripted motion.
//!
//! A [`Character`] composes an [`Entity`] with an optional [`Behavior`], a
//! dialog cycle, an expiring speech bubble, a seek target and, for NPCs, an
//! idle bob. Relations to other characters are [`EntityId`] handles resolved
//! by the owning scene.

use std::time::Duration;

use glam::Vec2;
use log::{debug, trace};

use crate::animation::Pose;
use crate::behavior::Behavior;
use crate::constants::{
    BOB_DISTANCE, BOB_INTERVAL, BOB_PAUSE, BUBBLE_LIFETIME, SEEK_ARRIVAL_DISTANCE,
};
use crate::entity::{Entity, EntityId};
use crate::error::SceneError;
use crate::geometry::{Rect, WorldBounds};
use crate::input::{GaitProfile, InputState};
use crate::vector_math::normalize_or_zero;

/// Non-empty list of lines a character cycles through when spoken to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    lines: Vec<String>,
    index: usize,
}

impl Dialog {
    /// Builds a dialog for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EmptyDialog`] when `lines` is empty.
    pub fn new(owner: &str, lines: Vec<String>) -> Result<Self, SceneError> {
        if lines.is_empty() {
            return Err(SceneError::EmptyDialog(owner.to_owned()));
        }
        Ok(Self { lines, index: 0 })
    }

    /// The line that will be shown next.
    #[must_use]
    pub fn current(&self) -> &str {
        self.lines.get(self.index).map_or("", String::as_str)
    }

    /// Position of the current line.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of lines.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always `false`; construction rejects empty dialogs.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Steps to the next line, wrapping after the last.
    pub const fn advance(&mut self) {
        self.index = (self.index + 1) % self.lines.len();
    }
}

/// Text shown above a character until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechBubble {
    /// Line being shown.
    pub text: String,
    /// Scene time at which the bubble appeared.
    pub created_at: Duration,
}

impl SpeechBubble {
    /// A bubble is expired once strictly more than `lifetime` has passed.
    #[must_use]
    pub fn is_expired(&self, now: Duration, lifetime: Duration) -> bool {
        now.saturating_sub(self.created_at) > lifetime
    }
}

/// Progress towards a one-shot destination.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Seek {
    /// No destination, or the last one was reached.
    #[default]
    Reached,
    /// Walking towards the point.
    Seeking(Vec2),
}

/// Phases of the NPC idle bob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BobPhase {
    /// Waiting `interval` before dipping down.
    #[default]
    Settled,
    /// Dipped; waiting `pause` before rising back.
    Dipped,
    /// Risen; waiting `interval` before the next cycle.
    Recovering,
}

/// Small periodic vertical motion for idle NPCs, independent of direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bob {
    phase: BobPhase,
    elapsed: Duration,
    interval: Duration,
    pause: Duration,
    distance: f32,
}

impl Bob {
    /// Builds a settled bob with the given timings and dip depth.
    #[must_use]
    pub const fn new(interval: Duration, pause: Duration, distance: f32) -> Self {
        Self {
            phase: BobPhase::Settled,
            elapsed: Duration::ZERO,
            interval,
            pause,
            distance,
        }
    }

    /// Current phase of the cycle.
    #[must_use]
    pub const fn phase(&self) -> BobPhase {
        self.phase
    }

    /// Advances the timer and returns the vertical shift to apply now.
    ///
    /// Leaving `Recovering` keeps the accumulated time, so the next dip
    /// happens on the following tick.
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed += dt;
        match self.phase {
            BobPhase::Settled if self.elapsed >= self.interval => {
                self.phase = BobPhase::Dipped;
                self.elapsed = Duration::ZERO;
                self.distance
            }
            BobPhase::Dipped if self.elapsed >= self.pause => {
                self.phase = BobPhase::Recovering;
                self.elapsed = Duration::ZERO;
                -self.distance
            }
            BobPhase::Recovering if self.elapsed >= self.interval => {
                self.phase = BobPhase::Settled;
                0.0
            }
            _ => 0.0,
        }
    }
}

impl Default for Bob {
    fn default() -> Self {
        Self::new(BOB_INTERVAL, BOB_PAUSE, BOB_DISTANCE)
    }
}

/// Snapshot of a leader, taken by the scene before the follower updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaderView {
    /// Leader position at the start of the tick.
    pub position: Vec2,
    /// Gap the follower keeps.
    pub trail_distance: f32,
    /// Pose the follower mirrors while closing in.
    pub pose: Pose,
}

/// Per-tick inputs shared by every character update.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Scene clock after advancing by `dt`.
    pub now: Duration,
    /// World every movement is clamped into.
    pub bounds: &'a WorldBounds,
}

/// A named entity with dialog, relations and optional scripted motion.
#[derive(Debug, Clone)]
pub struct Character {
    name: String,
    /// Position, movement and animation state.
    pub entity: Entity,
    behavior: Option<Behavior>,
    dialog: Dialog,
    bubble: Option<SpeechBubble>,
    bubble_lifetime: Duration,
    leader: Option<EntityId>,
    seek: Seek,
    seek_arrival: f32,
    bob: Option<Bob>,
}

impl Character {
    /// Creates a character with the given dialog lines.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EmptyDialog`] when `dialog` is empty.
    pub fn new(
        name: impl Into<String>,
        entity: Entity,
        dialog: Vec<String>,
    ) -> Result<Self, SceneError> {
        let owner = name.into();
        let cycle = Dialog::new(&owner, dialog)?;
        Ok(Self {
            name: owner,
            entity,
            behavior: None,
            dialog: cycle,
            bubble: None,
            bubble_lifetime: BUBBLE_LIFETIME,
            leader: None,
            seek: Seek::Reached,
            seek_arrival: SEEK_ARRIVAL_DISTANCE,
            bob: None,
        })
    }

    /// Attaches a scripted behaviour.
    #[must_use]
    pub fn with_behavior(mut self, behavior: impl Into<Behavior>) -> Self {
        self.behavior = Some(behavior.into());
        self
    }

    /// Marks the character as an NPC with the given idle bob.
    #[must_use]
    pub fn with_bob(mut self, bob: Bob) -> Self {
        self.bob = Some(bob);
        self
    }

    /// Overrides how long speech bubbles stay visible.
    #[must_use]
    pub fn with_bubble_lifetime(mut self, lifetime: Duration) -> Self {
        self.bubble_lifetime = lifetime;
        self
    }

    /// Overrides the distance at which a seek target snaps.
    #[must_use]
    pub fn with_seek_arrival(mut self, distance: f32) -> Self {
        self.seek_arrival = distance;
        self
    }

    /// Unique name within the scene.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// NPCs are the characters that bob while idle.
    #[must_use]
    pub const fn is_npc(&self) -> bool {
        self.bob.is_some()
    }

    /// The idle bob, for NPCs.
    #[must_use]
    pub const fn bob(&self) -> Option<&Bob> {
        self.bob.as_ref()
    }

    /// Replaces or removes the scripted behaviour.
    pub fn set_behavior(&mut self, behavior: Option<Behavior>) {
        self.behavior = behavior;
    }

    /// The scripted behaviour, if any.
    #[must_use]
    pub const fn behavior(&self) -> Option<&Behavior> {
        self.behavior.as_ref()
    }

    /// The current dialog line.
    #[must_use]
    pub fn interact(&self) -> &str {
        self.dialog.current()
    }

    /// Cycles to the next dialog line.
    pub const fn next_dialog(&mut self) {
        self.dialog.advance();
    }

    /// The full dialog cycle.
    #[must_use]
    pub const fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// Shows `text` in a bubble stamped with `now`.
    pub fn say(&mut self, text: impl Into<String>, now: Duration) {
        let line = text.into();
        debug!("{} says {line:?}", self.name);
        self.bubble = Some(SpeechBubble {
            text: line,
            created_at: now,
        });
    }

    /// Hides the speech bubble immediately.
    pub fn clear_bubble(&mut self) {
        self.bubble = None;
    }

    /// The visible speech bubble, if any.
    #[must_use]
    pub const fn bubble(&self) -> Option<&SpeechBubble> {
        self.bubble.as_ref()
    }

    /// Follows `leader` continuously from the next tick.
    pub const fn start_following(&mut self, leader: EntityId) {
        self.leader = Some(leader);
    }

    /// Ends the leader relation and stands still.
    pub const fn stop_following(&mut self) {
        self.leader = None;
        self.entity.direction = Vec2::ZERO;
    }

    /// The character being followed.
    #[must_use]
    pub const fn leader(&self) -> Option<EntityId> {
        self.leader
    }

    /// Walks to `target` and stops there, ignoring input meanwhile.
    ///
    /// Targets the sprite cannot occupy are pulled inside the world when
    /// the walk starts, so every seek terminates.
    pub const fn move_to(&mut self, target: Vec2) {
        self.seek = Seek::Seeking(target);
    }

    /// Progress of the current walk.
    #[must_use]
    pub const fn seek(&self) -> Seek {
        self.seek
    }

    /// `true` unless a seek target is pending.
    #[must_use]
    pub const fn reached_target(&self) -> bool {
        matches!(self.seek, Seek::Reached)
    }

    /// Applies player input. Ignored while a seek target is active.
    pub fn apply_input(&mut self, input: &InputState, profile: GaitProfile) {
        if !self.reached_target() {
            return;
        }
        self.entity.speed = profile.speed;
        self.entity.set_animation_speed(profile.animation_speed);
        self.entity.direction = input.direction();
    }

    /// Runs one tick: behaviour, seek, movement and animation, bob, bubble
    /// expiry and finally leader-follow.
    pub fn update(&mut self, ctx: &TickContext<'_>, leader: Option<LeaderView>) {
        let scripted = self.behavior.as_mut().map_or(Vec2::ZERO, |behavior| {
            behavior.update(&mut self.entity, ctx.dt)
        });

        self.step_seek(ctx);

        self.entity.integrate(ctx.dt, ctx.bounds);
        let motion = if self.entity.direction == Vec2::ZERO {
            scripted
        } else {
            self.entity.direction
        };
        self.entity.animate(ctx.dt, motion);

        if let Some(bob) = self.bob.as_mut() {
            let shift = bob.advance(Duration::try_from_secs_f32(ctx.dt).unwrap_or_default());
            if shift != 0.0 {
                self.entity.position.y += shift;
                self.entity.clamp_to(ctx.bounds);
            }
        }

        if self
            .bubble
            .as_ref()
            .is_some_and(|bubble| bubble.is_expired(ctx.now, self.bubble_lifetime))
        {
            trace!("{}'s bubble expired", self.name);
            self.bubble = None;
        }

        if let Some(view) = leader {
            self.follow(&view, ctx);
        }
    }

    /// Steers towards the seek target, snapping onto it once this tick's
    /// step would reach or pass it.
    fn step_seek(&mut self, ctx: &TickContext<'_>) {
        let Seek::Seeking(requested) = self.seek else {
            return;
        };
        let footprint = Rect::from_center(requested, self.entity.bounding_box().size());
        let target = ctx.bounds.clamp(&footprint).center();
        let offset = target - self.entity.position;
        let distance = offset.length();
        if distance < self.seek_arrival || self.entity.speed * ctx.dt >= distance {
            self.entity.position = target;
            self.entity.direction = Vec2::ZERO;
            self.seek = Seek::Reached;
            debug!("{} reached {target:?}", self.name);
        } else {
            self.entity.direction = normalize_or_zero(offset);
        }
    }

    /// Closes on the leader at this character's own speed, never stepping
    /// inside the leader's trail distance, and mirrors the leader's pose.
    fn follow(&mut self, leader: &LeaderView, ctx: &TickContext<'_>) {
        let offset = leader.position - self.entity.position;
        let distance = offset.length();
        if distance > leader.trail_distance {
            let step = (self.entity.speed * ctx.dt).min(distance - leader.trail_distance);
            self.entity.position += normalize_or_zero(offset) * step;
            self.entity.clamp_to(ctx.bounds);
            self.entity.mirror(leader.pose);
        } else {
            self.entity.direction = Vec2::ZERO;
        }
    }
}
