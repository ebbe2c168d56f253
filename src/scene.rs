//! The scene: entity registry, active character, clock and camera.
//!
//! [`Scene`] owns every [`Character`]; relations between them are
//! [`EntityId`] handles into its registry. One call to [`Scene::update`] runs
//! a whole tick: input goes to the active character, every leader drags its
//! trailing followers, each character updates in insertion order, and
//! finally the camera re-centres on the active character.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use log::{debug, info, warn};

use crate::animation::{FrameLibrary, FrameRef, FrameSet};
use crate::camera::{Camera, Viewport};
use crate::character::{Character, LeaderView, TickContext};
use crate::config::{SceneConfig, Tuning};
use crate::entity::{Entity, EntityId};
use crate::error::SceneError;
use crate::geometry::WorldBounds;
use crate::input::{InputState, SceneAction};

/// One sprite to draw, in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Character being drawn.
    pub id: EntityId,
    /// Top-left corner with the camera offset applied.
    pub screen_position: Vec2,
    /// Sprite frame from the character's pose.
    pub frame: FrameRef,
    /// Speech bubble text to render above the sprite.
    pub bubble: Option<String>,
}

#[derive(Debug, Clone)]
struct Snapshot {
    characters: Vec<Character>,
    active: EntityId,
}

/// Owns the characters of one map and steps them each frame.
#[derive(Debug, Clone)]
pub struct Scene {
    characters: Vec<Character>,
    party: Vec<EntityId>,
    active: Option<EntityId>,
    bounds: WorldBounds,
    camera: Camera,
    tuning: Tuning,
    clock: Duration,
    initial: Option<Box<Snapshot>>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub const fn new(bounds: WorldBounds, viewport: Viewport, tuning: Tuning) -> Self {
        Self {
            characters: Vec::new(),
            party: Vec::new(),
            active: None,
            bounds,
            camera: Camera::new(viewport),
            tuning,
            clock: Duration::ZERO,
            initial: None,
        }
    }

    /// Builds a scene from a description, resolving sprites through
    /// `library` and names into handles.
    ///
    /// Frame sets are validated once per sprite here, so a missing
    /// animation state fails the load instead of a later frame.
    ///
    /// # Errors
    ///
    /// Returns a [`SceneError`] for invalid bounds, empty dialogs, unknown or
    /// incomplete sprites, unknown character names and self-follows.
    pub fn from_config(
        config: &SceneConfig,
        library: &dyn FrameLibrary,
    ) -> Result<Self, SceneError> {
        let bounds = WorldBounds::from_rect(config.world)?;
        let [width, height] = config.viewport;
        let tuning = config.tuning;
        let mut scene = Self::new(bounds, Viewport::new(width, height), tuning);

        let mut frame_sets: HashMap<&str, Arc<FrameSet>> = HashMap::new();
        let mut ids: HashMap<&str, EntityId> = HashMap::new();
        for entry in &config.characters {
            let sprite = entry.sprite();
            let frames = match frame_sets.entry(sprite) {
                Entry::Occupied(cached) => Arc::clone(cached.get()),
                Entry::Vacant(slot) => {
                    let named = library
                        .frames_for(sprite)
                        .ok_or_else(|| SceneError::UnknownSprite(sprite.to_owned()))?;
                    Arc::clone(slot.insert(Arc::new(FrameSet::from_named(sprite, named)?)))
                }
            };

            let mut entity = Entity::new(Vec2::from_array(entry.position), frames)
                .with_size(tuning.sprite_size());
            entity.speed = tuning.walk.speed;
            entity.set_animation_speed(tuning.walk.animation_speed);
            entity.trail_distance = entry.trail_distance.unwrap_or(tuning.trail_distance);

            let mut character = Character::new(entry.name.clone(), entity, entry.dialog.clone())?
                .with_bubble_lifetime(tuning.bubble_lifetime())
                .with_seek_arrival(tuning.seek_arrival_distance);
            if entry.npc {
                character = character.with_bob(tuning.bob());
            }
            if let Some(behavior) = &entry.behavior {
                character = character.with_behavior(behavior.build());
            }
            ids.insert(entry.name.as_str(), scene.spawn(character));
        }

        let resolve = |name: &str| {
            ids.get(name)
                .copied()
                .ok_or_else(|| SceneError::UnknownCharacter(name.to_owned()))
        };

        for entry in &config.characters {
            let id = resolve(entry.name.as_str())?;
            if let Some(leader) = &entry.leader {
                scene.start_following(id, resolve(leader.as_str())?)?;
            }
            for follower in &entry.followers {
                scene.add_trailing_follower(id, resolve(follower.as_str())?)?;
            }
        }

        let party = if config.party.is_empty() {
            config
                .characters
                .iter()
                .filter(|entry| !entry.npc)
                .map(|entry| resolve(entry.name.as_str()))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            config
                .party
                .iter()
                .map(|name| resolve(name.as_str()))
                .collect::<Result<Vec<_>, _>>()?
        };
        scene.set_party(party);

        let active = config.active.as_deref().map_or_else(
            || scene.party.first().copied().ok_or(SceneError::EmptyScene),
            resolve,
        )?;
        scene.set_active(active)?;
        scene.mark_initial();

        info!(
            "scene ready: {} characters, {} sprites, active {}",
            scene.characters.len(),
            frame_sets.len(),
            active
        );
        Ok(scene)
    }

    /// Adds a character and returns its handle. The first character added
    /// becomes active if none is.
    pub fn spawn(&mut self, character: Character) -> EntityId {
        let id = EntityId(self.characters.len());
        debug!("spawned {} as {id}", character.name());
        self.characters.push(character);
        if self.active.is_none() {
            self.active = Some(id);
        }
        id
    }

    /// Sets the switchable party, in slot order.
    pub fn set_party(&mut self, party: Vec<EntityId>) {
        self.party = party;
    }

    /// Party handles in slot order.
    #[must_use]
    pub fn party(&self) -> &[EntityId] {
        &self.party
    }

    /// Records the current state as the target of [`SceneAction::Restart`].
    pub fn mark_initial(&mut self) {
        self.initial = self.active.map(|active| {
            Box::new(Snapshot {
                characters: self.characters.clone(),
                active,
            })
        });
    }

    /// The playable area.
    #[must_use]
    pub const fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    /// Movement and timer tuning.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Time accumulated by [`Scene::update`].
    #[must_use]
    pub const fn clock(&self) -> Duration {
        self.clock
    }

    /// Camera following the active character.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The character receiving player input.
    #[must_use]
    pub const fn active(&self) -> Option<EntityId> {
        self.active
    }

    /// Whether `id` receives player input.
    #[must_use]
    pub fn is_active(&self, id: EntityId) -> bool {
        self.active == Some(id)
    }

    /// Number of characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.characters.len()
    }

    /// `true` before any character is spawned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Borrows a character by handle.
    #[must_use]
    pub fn character(&self, id: EntityId) -> Option<&Character> {
        self.characters.get(id.index())
    }

    /// Mutably borrows a character by handle.
    pub fn character_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.characters.get_mut(id.index())
    }

    /// Looks up a character handle by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.characters
            .iter()
            .position(|character| character.name() == name)
            .map(EntityId)
    }

    /// Iterates characters in insertion (and draw) order.
    pub fn characters(&self) -> impl Iterator<Item = (EntityId, &Character)> {
        self.characters
            .iter()
            .enumerate()
            .map(|(index, character)| (EntityId(index), character))
    }

    const fn require(&self, id: EntityId) -> Result<(), SceneError> {
        if id.index() < self.characters.len() {
            Ok(())
        } else {
            Err(SceneError::UnknownEntity(id))
        }
    }

    /// Hands player input to `id`. The previous active character stops.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] for a dangling handle.
    pub fn set_active(&mut self, id: EntityId) -> Result<(), SceneError> {
        self.require(id)?;
        if let Some(previous) = self.active.filter(|current| *current != id) {
            if let Some(character) = self.characters.get_mut(previous.index()) {
                character.entity.direction = Vec2::ZERO;
            }
        }
        self.active = Some(id);
        self.track_active();
        Ok(())
    }

    /// Makes `follower` trail behind `leader` via the leader's follower list.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::SelfFollow`] when both handles are equal and
    /// [`SceneError::UnknownEntity`] for dangling handles.
    pub fn add_trailing_follower(
        &mut self,
        leader: EntityId,
        follower: EntityId,
    ) -> Result<(), SceneError> {
        self.require(follower)?;
        if leader == follower {
            return Err(SceneError::SelfFollow(leader));
        }
        let character = self
            .characters
            .get_mut(leader.index())
            .ok_or(SceneError::UnknownEntity(leader))?;
        character.entity.add_follower(follower);
        Ok(())
    }

    /// Removes `follower` from `leader`'s trailing list.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] when `leader` is dangling.
    pub fn remove_trailing_follower(
        &mut self,
        leader: EntityId,
        follower: EntityId,
    ) -> Result<(), SceneError> {
        let character = self
            .characters
            .get_mut(leader.index())
            .ok_or(SceneError::UnknownEntity(leader))?;
        character.entity.remove_follower(follower);
        Ok(())
    }

    /// Sets `follower`'s continuous leader relation.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::SelfFollow`] when both handles are equal and
    /// [`SceneError::UnknownEntity`] for dangling handles.
    pub fn start_following(
        &mut self,
        follower: EntityId,
        leader: EntityId,
    ) -> Result<(), SceneError> {
        self.require(leader)?;
        if leader == follower {
            return Err(SceneError::SelfFollow(follower));
        }
        let character = self
            .characters
            .get_mut(follower.index())
            .ok_or(SceneError::UnknownEntity(follower))?;
        character.start_following(leader);
        debug!("{} now follows {leader}", character.name());
        Ok(())
    }

    /// Clears `follower`'s leader relation.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] for a dangling handle.
    pub fn stop_following(&mut self, follower: EntityId) -> Result<(), SceneError> {
        let character = self
            .characters
            .get_mut(follower.index())
            .ok_or(SceneError::UnknownEntity(follower))?;
        character.stop_following();
        Ok(())
    }

    /// Sends `id` walking to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] for a dangling handle.
    pub fn move_to(&mut self, id: EntityId, target: Vec2) -> Result<(), SceneError> {
        let character = self
            .characters
            .get_mut(id.index())
            .ok_or(SceneError::UnknownEntity(id))?;
        character.move_to(target);
        Ok(())
    }

    /// The character closest to the active one within the interaction
    /// range, excluding the active character itself.
    #[must_use]
    pub fn nearest_to_active(&self) -> Option<EntityId> {
        let active = self.active?;
        let origin = self.character(active)?.entity.position;
        let range = self.tuning.interact_range;
        self.characters()
            .filter(|(id, _)| *id != active)
            .map(|(id, character)| (id, character.entity.position.distance(origin)))
            .filter(|(_, distance)| *distance <= range)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(id, _)| id)
    }

    /// Applies a discrete action. Returns the line spoken, if any.
    pub fn apply(&mut self, action: SceneAction) -> Option<String> {
        match action {
            SceneAction::Interact => self.interact(),
            SceneAction::CycleDialog => {
                let target = self.nearest_to_active()?;
                let now = self.clock;
                let character = self.character_mut(target)?;
                character.next_dialog();
                let line = character.interact().to_owned();
                character.say(line.clone(), now);
                Some(line)
            }
            SceneAction::ToggleFollow => {
                self.toggle_follow();
                None
            }
            SceneAction::ClearBubble => {
                for character in &mut self.characters {
                    character.clear_bubble();
                }
                None
            }
            SceneAction::SwitchCharacter(slot) => {
                let Some(id) = self.party.get(slot).copied() else {
                    debug!("party slot {slot} is empty");
                    return None;
                };
                if let Err(err) = self.set_active(id) {
                    warn!("cannot switch to slot {slot}: {err}");
                }
                None
            }
            SceneAction::Restart => {
                self.restart();
                None
            }
        }
    }

    /// Shows the nearest character's current line in a bubble and returns it.
    pub fn interact(&mut self) -> Option<String> {
        let target = self.nearest_to_active()?;
        let now = self.clock;
        let character = self.character_mut(target)?;
        let line = character.interact().to_owned();
        character.say(line.clone(), now);
        Some(line)
    }

    fn toggle_follow(&mut self) {
        let (Some(active), Some(target)) = (self.active, self.nearest_to_active()) else {
            return;
        };
        let Some(character) = self.character_mut(target) else {
            return;
        };
        if character.leader() == Some(active) {
            character.stop_following();
            info!("{} stopped following", character.name());
        } else {
            character.start_following(active);
            info!("{} started following {active}", character.name());
        }
    }

    /// Restores the snapshot taken by [`Scene::mark_initial`].
    pub fn restart(&mut self) {
        let Some(snapshot) = self.initial.as_deref() else {
            warn!("restart requested before the scene was marked");
            return;
        };
        self.characters = snapshot.characters.clone();
        self.active = Some(snapshot.active);
        self.clock = Duration::ZERO;
        self.track_active();
        info!("scene restarted");
    }

    /// Advances the scene by `delta` seconds, capped by
    /// [`Tuning::clamp_delta`].
    pub fn update(&mut self, delta: f32, input: &InputState) {
        let dt = self.tuning.clamp_delta(delta);
        self.clock += Duration::try_from_secs_f32(dt).unwrap_or_default();
        for character in &mut self.characters {
            character.entity.begin_tick();
        }

        if let Some(active) = self.active {
            let profile = input.gait().profile(&self.tuning);
            if let Some(character) = self.characters.get_mut(active.index()) {
                character.apply_input(input, profile);
            }
        }

        let bounds = self.bounds;
        let ctx = TickContext {
            dt,
            now: self.clock,
            bounds: &bounds,
        };
        for index in 0..self.characters.len() {
            self.propagate_trail(EntityId(index), dt);
        }
        for index in 0..self.characters.len() {
            let leader = self.leader_view(EntityId(index));
            if let Some(character) = self.characters.get_mut(index) {
                character.update(&ctx, leader);
            }
        }

        self.track_active();
    }

    fn propagate_trail(&mut self, leader: EntityId, dt: f32) {
        let Some(character) = self.characters.get(leader.index()) else {
            return;
        };
        let anchor = character.entity.position;
        let followers = character.entity.followers().to_vec();
        for follower in followers {
            // The active character is steered by input alone.
            if follower == leader || self.active == Some(follower) {
                continue;
            }
            if let Some(trailing) = self.characters.get_mut(follower.index()) {
                trailing.entity.trail(anchor, dt, &self.bounds);
            }
        }
    }

    fn leader_view(&self, follower: EntityId) -> Option<LeaderView> {
        let leader = self.character(follower)?.leader()?;
        if leader == follower {
            return None;
        }
        let entity = &self.character(leader)?.entity;
        Some(LeaderView {
            position: entity.position,
            trail_distance: entity.trail_distance,
            pose: entity.pose(),
        })
    }

    fn track_active(&mut self) {
        let Some(tracked) = self
            .active
            .and_then(|id| self.characters.get(id.index()))
            .map(|character| character.entity.bounding_box())
        else {
            return;
        };
        self.camera.track(&tracked, &self.bounds);
    }

    /// Sprites in insertion order with the camera offset applied.
    #[must_use]
    pub fn draw_list(&self) -> Vec<DrawCommand> {
        self.characters()
            .map(|(id, character)| DrawCommand {
                id,
                screen_position: self
                    .camera
                    .world_to_screen(character.entity.bounding_box().top_left()),
                frame: character.entity.pose().frame,
                bubble: character.bubble().map(|bubble| bubble.text.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SequentialFrames;
    use approx::assert_relative_eq;

    fn demo() -> Scene {
        Scene::from_config(&SceneConfig::demo(), &SequentialFrames { frames_per_state: 4 })
            .expect("demo scene builds")
    }

    #[test]
    fn demo_scene_resolves_names() {
        let scene = demo();
        let hero = scene.find("hero").expect("hero");
        let scout = scene.find("scout").expect("scout");
        assert!(scene.is_active(hero));
        assert_eq!(scene.party().len(), 3);
        let hero_entity = &scene.character(hero).expect("hero").entity;
        assert_eq!(hero_entity.followers(), &[scout]);
    }

    #[test]
    fn self_follow_is_rejected() {
        let mut scene = demo();
        let hero = scene.find("hero").expect("hero");
        assert!(matches!(
            scene.start_following(hero, hero),
            Err(SceneError::SelfFollow(_))
        ));
        assert!(matches!(
            scene.add_trailing_follower(hero, hero),
            Err(SceneError::SelfFollow(_))
        ));
    }

    #[test]
    fn dangling_handles_are_rejected() {
        let mut scene = demo();
        assert!(matches!(
            scene.set_active(EntityId(99)),
            Err(SceneError::UnknownEntity(EntityId(99)))
        ));
        assert!(scene.move_to(EntityId(99), Vec2::ZERO).is_err());
    }

    #[test]
    fn input_only_moves_active_character() {
        let mut scene = demo();
        let hero = scene.find("hero").expect("hero");
        let bard = scene.find("bard").expect("bard");
        let bard_start = scene.character(bard).expect("bard").entity.position;
        let hero_start = scene.character(hero).expect("hero").entity.position;

        let input = InputState {
            left: true,
            ..InputState::default()
        };
        scene.update(0.1, &input);

        let hero_now = scene.character(hero).expect("hero").entity.position;
        assert!(hero_now.x < hero_start.x);
        assert_eq!(
            scene.character(bard).expect("bard").entity.position,
            bard_start
        );
    }

    #[test]
    fn switching_character_moves_camera_target() {
        let mut scene = demo();
        let bard = scene.find("bard").expect("bard");
        scene.apply(SceneAction::SwitchCharacter(2));
        assert!(scene.is_active(bard));
        scene.apply(SceneAction::SwitchCharacter(7));
        assert!(scene.is_active(bard));
    }

    #[test]
    fn restart_restores_initial_positions() {
        let mut scene = demo();
        let hero = scene.find("hero").expect("hero");
        let start = scene.character(hero).expect("hero").entity.position;
        let input = InputState {
            down: true,
            ..InputState::default()
        };
        for _ in 0..10 {
            scene.update(0.1, &input);
        }
        assert_ne!(scene.character(hero).expect("hero").entity.position, start);
        scene.apply(SceneAction::Restart);
        assert_eq!(scene.character(hero).expect("hero").entity.position, start);
        assert_eq!(scene.clock(), Duration::ZERO);
    }

    #[test]
    fn detached_follower_stays_put() {
        let mut scene = demo();
        let hero = scene.find("hero").expect("hero");
        let scout = scene.find("scout").expect("scout");
        scene.remove_trailing_follower(hero, scout).expect("hero exists");
        let before = scene.character(scout).expect("scout").entity.position;

        let input = InputState {
            right: true,
            ..InputState::default()
        };
        for _ in 0..20 {
            scene.update(0.1, &input);
        }
        assert_eq!(scene.character(scout).expect("scout").entity.position, before);
    }

    #[test]
    fn stop_following_clears_leader() {
        let mut scene = demo();
        let hero = scene.find("hero").expect("hero");
        let bard = scene.find("bard").expect("bard");
        scene.start_following(bard, hero).expect("valid relation");
        assert_eq!(scene.character(bard).expect("bard").leader(), Some(hero));
        scene.stop_following(bard).expect("bard exists");
        assert_eq!(scene.character(bard).expect("bard").leader(), None);
    }

    #[test]
    fn active_trailing_follower_obeys_input() {
        let mut scene = demo();
        let scout = scene.find("scout").expect("scout");
        scene.apply(SceneAction::SwitchCharacter(1));
        assert!(scene.is_active(scout));

        let input = InputState {
            down: true,
            ..InputState::default()
        };
        for _ in 0..20 {
            scene.update(0.1, &input);
        }
        let position = scene.character(scout).expect("scout").entity.position;
        assert_relative_eq!(position.x, 3100.0);
        assert_relative_eq!(position.y, 1900.0, epsilon = 1e-3);
    }

    #[test]
    fn update_caps_frame_delta() {
        let mut scene = demo();
        let hero = scene.find("hero").expect("hero");
        let start = scene.character(hero).expect("hero").entity.position;
        let input = InputState {
            right: true,
            ..InputState::default()
        };

        scene.update(f32::NAN, &input);
        scene.update(-1.0, &input);
        assert_eq!(scene.character(hero).expect("hero").entity.position, start);
        assert_eq!(scene.clock(), Duration::ZERO);

        scene.update(5.0, &input);
        let max = scene.tuning().max_delta_seconds;
        let moved = scene.character(hero).expect("hero").entity.position;
        assert_relative_eq!(moved.x - start.x, scene.tuning().walk.speed * max);
        assert_eq!(scene.clock(), Duration::from_secs_f32(max));
    }

    #[test]
    fn draw_list_preserves_insertion_order() {
        let scene = demo();
        let ids: Vec<_> = scene.draw_list().into_iter().map(|command| command.id).collect();
        let expected: Vec<_> = (0..scene.len()).map(EntityId).collect();
        assert_eq!(ids, expected);
    }
}
