//! Scene construction against a mocked frame library.

use hashbrown::HashMap;
use mockall::mock;
use mockall::predicate::eq;
use rstest::rstest;
use tilewalk::{
    CharacterConfig, FrameLibrary, FrameRef, Scene, SceneConfig, SceneError, StateKey,
};

mock! {
    pub Library {}

    impl FrameLibrary for Library {
        fn frames_for(&self, sprite: &str) -> Option<HashMap<String, Vec<FrameRef>>>;
    }
}

fn full_strips() -> HashMap<String, Vec<FrameRef>> {
    StateKey::all()
        .map(|state| (state.to_string(), vec![FrameRef(0), FrameRef(1)]))
        .collect()
}

fn character(name: &str, sprite: &str) -> CharacterConfig {
    CharacterConfig {
        name: name.to_owned(),
        sprite: Some(sprite.to_owned()),
        position: [500.0, 500.0],
        dialog: vec![format!("I am {name}.")],
        npc: false,
        behavior: None,
        leader: None,
        followers: Vec::new(),
        trail_distance: None,
    }
}

fn config(characters: Vec<CharacterConfig>) -> SceneConfig {
    SceneConfig {
        characters,
        party: Vec::new(),
        active: None,
        ..SceneConfig::demo()
    }
}

#[test]
fn frame_sets_are_requested_once_per_sprite() {
    let mut library = MockLibrary::new();
    library
        .expect_frames_for()
        .with(eq("player"))
        .times(1)
        .returning(|_| Some(full_strips()));
    library
        .expect_frames_for()
        .with(eq("npc"))
        .times(1)
        .returning(|_| Some(full_strips()));

    let scene = Scene::from_config(&SceneConfig::demo(), &library).expect("demo scene");
    assert_eq!(scene.len(), 6);
}

#[test]
fn unknown_sprite_is_reported() {
    let mut library = MockLibrary::new();
    library.expect_frames_for().returning(|_| None);

    let result = Scene::from_config(&config(vec![character("hero", "ghost")]), &library);
    assert!(matches!(result, Err(SceneError::UnknownSprite(sprite)) if sprite == "ghost"));
}

#[test]
fn missing_animation_state_is_reported() {
    let mut library = MockLibrary::new();
    library.expect_frames_for().returning(|_| {
        let mut strips = full_strips();
        strips.remove("left_idle");
        Some(strips)
    });

    let result = Scene::from_config(&config(vec![character("hero", "player")]), &library);
    assert!(matches!(
        result,
        Err(SceneError::MissingFrames { state, .. }) if state == "left_idle"
    ));
}

#[rstest]
#[case::unknown_leader(Some("nobody"), Vec::new())]
#[case::unknown_follower(None, vec!["nobody".to_owned()])]
fn unknown_relations_are_reported(#[case] leader: Option<&str>, #[case] followers: Vec<String>) {
    let mut library = MockLibrary::new();
    library.expect_frames_for().returning(|_| Some(full_strips()));

    let mut hero = character("hero", "player");
    hero.leader = leader.map(str::to_owned);
    hero.followers = followers;

    let result = Scene::from_config(&config(vec![hero]), &library);
    assert!(matches!(result, Err(SceneError::UnknownCharacter(name)) if name == "nobody"));
}

#[test]
fn self_follow_in_config_is_rejected() {
    let mut library = MockLibrary::new();
    library.expect_frames_for().returning(|_| Some(full_strips()));

    let mut hero = character("hero", "player");
    hero.leader = Some("hero".to_owned());

    let result = Scene::from_config(&config(vec![hero]), &library);
    assert!(matches!(result, Err(SceneError::SelfFollow(_))));
}

#[test]
fn empty_scene_is_rejected() {
    let library = MockLibrary::new();
    let result = Scene::from_config(&config(Vec::new()), &library);
    assert!(matches!(result, Err(SceneError::EmptyScene)));
}

#[test]
fn party_defaults_to_non_npcs() {
    let mut library = MockLibrary::new();
    library.expect_frames_for().returning(|_| Some(full_strips()));

    let mut elder = character("elder", "player");
    elder.npc = true;
    let scene = Scene::from_config(
        &config(vec![elder, character("hero", "player"), character("scout", "player")]),
        &library,
    )
    .expect("scene");

    let hero = scene.find("hero").expect("hero");
    let scout = scene.find("scout").expect("scout");
    assert_eq!(scene.party(), &[hero, scout]);
    assert!(scene.is_active(hero));
}
