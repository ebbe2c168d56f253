//! Headless driver for the exploration scene.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bevy::prelude::*;
use clap::{Parser, ValueEnum};
use log::info;
use tilewalk::{
    init_logging, CameraView, ExplorationPlugin, PlayerInput, Scene, SceneConfig, SceneState,
    SequentialFrames,
};

/// Runs a headless exploration scene and reports where everyone ended up.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene description in JSON; the built-in demo is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    step_ms: u64,

    /// Keys held for the whole run
    #[arg(long, value_enum)]
    hold: Vec<HeldKey>,

    /// Walk the active character to `X,Y` before taking input
    #[arg(long, value_parser = parse_point)]
    seek: Option<Vec2>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeldKey {
    Up,
    Down,
    Left,
    Right,
    Sprint,
    Boost,
}

fn parse_point(raw: &str) -> Result<Vec2, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{raw}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f32>()
            .map_err(|err| format!("bad coordinate `{part}`: {err}"))
    };
    Ok(Vec2::new(parse(x)?, parse(y)?))
}

fn load_scene(args: &Args) -> Result<Scene> {
    let config = args.config.as_ref().map_or_else(
        || Ok(SceneConfig::demo()),
        |path| {
            SceneConfig::load(path)
                .with_context(|| format!("loading scene from {}", path.display()))
        },
    )?;
    let frames = SequentialFrames {
        frames_per_state: 4,
    };
    let mut scene = Scene::from_config(&config, &frames).context("building scene")?;
    if let (Some(target), Some(active)) = (args.seek, scene.active()) {
        scene.move_to(active, target)?;
    }
    Ok(scene)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let loaded = load_scene(&args)?;
    let mut app = App::new();
    app.init_resource::<Time>();
    app.add_plugins(ExplorationPlugin::new(loaded));

    {
        let mut input = app.world_mut().resource_mut::<PlayerInput>();
        for key in &args.hold {
            match key {
                HeldKey::Up => input.state.up = true,
                HeldKey::Down => input.state.down = true,
                HeldKey::Left => input.state.left = true,
                HeldKey::Right => input.state.right = true,
                HeldKey::Sprint => input.state.left_shift = true,
                HeldKey::Boost => input.state.boost = true,
            }
        }
    }

    let step = Duration::from_millis(args.step_ms);
    for _ in 0..args.ticks {
        app.world_mut().resource_mut::<Time>().advance_by(step);
        app.update();
    }

    let scene = &app.world().resource::<SceneState>().0;
    info!(
        "simulated {} frames ({:.2}s of scene time)",
        args.ticks,
        scene.clock().as_secs_f32()
    );
    for (id, character) in scene.characters() {
        let marker = if scene.is_active(id) { "*" } else { " " };
        info!(
            "{marker} {id} {:<10} at ({:.1}, {:.1}) {}",
            character.name(),
            character.entity.position.x,
            character.entity.position.y,
            character.entity.pose().state
        );
    }
    let offset = app.world().resource::<CameraView>().offset;
    info!("camera offset ({:.1}, {:.1})", offset.x, offset.y);
    Ok(())
}
