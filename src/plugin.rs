//! Bevy plugin driving a [`Scene`] from the frame clock and the keyboard.
//!
//! The plugin is a thin shell: keyboard state is translated into an
//! [`InputState`] plus edge-triggered [`SceneAction`]s, the scene advances by
//! the (capped) frame delta, and the resulting camera offset is published for
//! whatever renders the draw list.

use bevy::prelude::*;
use log::info;

use crate::input::{InputState, SceneAction};
use crate::scene::Scene;

/// The running scene.
#[derive(Resource, Debug, Clone)]
pub struct SceneState(pub Scene);

/// Camera offset published after each scene update.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraView {
    /// Added to world positions to obtain screen positions.
    pub offset: Vec2,
}

/// Input gathered for the next scene update.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Held keys.
    pub state: InputState,
    /// Actions triggered this frame, applied in order.
    pub actions: Vec<SceneAction>,
}

const PARTY_KEYS: [KeyCode; 3] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];

/// Translates held keys and fresh key presses into [`PlayerInput`].
///
/// Without a keyboard resource (headless runs) the held state and queued
/// actions are left as the caller set them.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn read_keyboard_system(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut input: ResMut<PlayerInput>,
) {
    let Some(keyboard) = keys else {
        return;
    };

    input.state = InputState {
        up: keyboard.pressed(KeyCode::KeyW),
        down: keyboard.pressed(KeyCode::KeyS),
        left: keyboard.pressed(KeyCode::KeyA),
        right: keyboard.pressed(KeyCode::KeyD),
        left_shift: keyboard.pressed(KeyCode::ShiftLeft),
        right_shift: keyboard.pressed(KeyCode::ShiftRight),
        boost: keyboard.pressed(KeyCode::Space),
    };

    let triggers = [
        (KeyCode::KeyE, SceneAction::Interact),
        (KeyCode::KeyN, SceneAction::CycleDialog),
        (KeyCode::KeyF, SceneAction::ToggleFollow),
        (KeyCode::KeyC, SceneAction::ClearBubble),
        (KeyCode::KeyR, SceneAction::Restart),
    ];
    for (key, action) in triggers {
        if keyboard.just_pressed(key) {
            input.actions.push(action);
        }
    }
    for (slot, key) in PARTY_KEYS.into_iter().enumerate() {
        if keyboard.just_pressed(key) {
            input.actions.push(SceneAction::SwitchCharacter(slot));
        }
    }
}

/// Applies queued actions, then advances the scene by the frame delta.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn advance_scene_system(
    time: Res<Time>,
    mut input: ResMut<PlayerInput>,
    mut state: ResMut<SceneState>,
) {
    let scene = &mut state.0;
    for action in input.actions.drain(..) {
        if let Some(line) = scene.apply(action) {
            info!("{line}");
        }
    }
    scene.update(time.delta_secs(), &input.state);
}

/// Copies the scene camera offset into [`CameraView`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn update_camera_system(scene: Res<SceneState>, mut view: ResMut<CameraView>) {
    let offset = scene.0.camera().offset();
    if view.offset != offset {
        view.offset = offset;
    }
}

/// Installs the scene resources and the per-frame systems.
///
/// ```
/// use bevy::prelude::*;
/// use tilewalk::{ExplorationPlugin, Scene, SceneConfig, SequentialFrames};
///
/// let scene = Scene::from_config(
///     &SceneConfig::demo(),
///     &SequentialFrames { frames_per_state: 4 },
/// )
/// .expect("demo scene");
///
/// let mut app = App::new();
/// app.init_resource::<Time>();
/// app.add_plugins(ExplorationPlugin::new(scene));
/// app.update();
/// ```
#[derive(Debug)]
pub struct ExplorationPlugin {
    scene: Scene,
}

impl ExplorationPlugin {
    /// Wraps the scene the plugin will install.
    #[must_use]
    pub const fn new(scene: Scene) -> Self {
        Self { scene }
    }
}

impl Plugin for ExplorationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SceneState(self.scene.clone()));
        app.insert_resource(CameraView {
            offset: self.scene.camera().offset(),
        });
        app.init_resource::<PlayerInput>();
        app.add_systems(
            Update,
            (
                read_keyboard_system,
                advance_scene_system,
                update_camera_system,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::animation::SequentialFrames;
    use crate::config::SceneConfig;
    use rstest::{fixture, rstest};

    #[fixture]
    fn app() -> App {
        let scene = Scene::from_config(
            &SceneConfig::demo(),
            &SequentialFrames {
                frames_per_state: 4,
            },
        )
        .expect("demo scene builds");
        let mut app = App::new();
        app.init_resource::<Time>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.add_plugins(ExplorationPlugin::new(scene));
        app
    }

    fn step(app: &mut App, millis: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(millis));
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .clear();
    }

    fn hero_x(app: &App) -> f32 {
        let scene = &app.world().resource::<SceneState>().0;
        let hero = scene.find("hero").expect("hero");
        scene.character(hero).expect("hero").entity.position.x
    }

    #[rstest]
    fn plugin_inserts_resources(app: App) {
        assert!(app.world().contains_resource::<SceneState>());
        assert!(app.world().contains_resource::<CameraView>());
        assert!(app.world().contains_resource::<PlayerInput>());
    }

    #[rstest]
    fn held_key_moves_active_character(mut app: App) {
        let start = hero_x(&app);
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyD);
        step(&mut app, 100);
        assert!(hero_x(&app) > start);
    }

    #[rstest]
    fn frame_hitch_is_capped(mut app: App) {
        let start = hero_x(&app);
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyD);
        step(&mut app, 2_000);
        let moved = hero_x(&app) - start;
        assert!(moved <= 125.0 * 0.1 + 1e-3, "moved {moved}");
    }

    #[rstest]
    fn digit_key_switches_active_character(mut app: App) {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Digit3);
        step(&mut app, 16);
        let scene = &app.world().resource::<SceneState>().0;
        let bard = scene.find("bard").expect("bard");
        assert!(scene.is_active(bard));
        assert!(app.world().resource::<PlayerInput>().actions.is_empty());
    }

    #[rstest]
    fn camera_view_tracks_scene(mut app: App) {
        step(&mut app, 16);
        let scene_offset = app.world().resource::<SceneState>().0.camera().offset();
        assert_eq!(app.world().resource::<CameraView>().offset, scene_offset);
    }
}
