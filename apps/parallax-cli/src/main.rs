use anyhow::Context;
use clap::{Parser, Subcommand};
use parallax_common::{Rect, TextureHandle, WorldSize};
use parallax_input::{Callbacks, InputEvent, InputSink};
use parallax_render::{DebugTextBackend, Scene, SceneConfig};
use parallax_tools::SceneInspector;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "parallax-cli",
    about = "Headless runner for the parallax scene"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the demo scene for a number of ticks, replaying scripted input
    Simulate {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// RNG seed for the smoke emitter
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Scene config (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Input script (.yaml, .yml or .json): a list of `{ at, event }` steps
        #[arg(long)]
        script: Option<PathBuf>,
        /// Viewport width in logical pixels
        #[arg(long, default_value = "1000")]
        width: f32,
        /// Viewport height in logical pixels
        #[arg(long, default_value = "1080")]
        height: f32,
        /// Print the draw list of the final frame
        #[arg(long)]
        frame: bool,
        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load and validate a scene config, then print it resolved with defaults
    ValidateConfig {
        path: PathBuf,
    },
}

/// One scripted input event, applied before the tick numbered `at`.
#[derive(Debug, Deserialize)]
struct ScriptStep {
    #[serde(default)]
    at: u64,
    event: InputEvent,
}

fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    let steps: Vec<ScriptStep> = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&data)?,
        Some("yaml" | "yml") => serde_yaml::from_str(&data)?,
        other => anyhow::bail!("unsupported script format: {}", other.unwrap_or("<none>")),
    };
    Ok(steps)
}

/// Demo scene: a 1920x1080 backdrop with three overlapping panels.
fn demo_scene(config: SceneConfig, seed: u64) -> anyhow::Result<Scene> {
    let mut scene = Scene::with_seed(config, seed)?;
    scene.set_background(WorldSize::new(1920.0, 1080.0)?, Some(TextureHandle(1)));
    scene.set_particle_texture(TextureHandle(2));

    let panels = [
        ("left panel", Rect::new(360.0, 420.0, 280.0, 360.0)),
        ("center panel", Rect::new(820.0, 380.0, 280.0, 420.0)),
        ("right panel", Rect::new(1020.0, 460.0, 280.0, 360.0)),
    ];
    for (index, (name, rect)) in panels.into_iter().enumerate() {
        let handler = Callbacks::new()
            .with_enter(move |id| tracing::info!(sprite = %id, name, "enter"))
            .with_leave(move |id| tracing::info!(sprite = %id, name, "leave"))
            .with_click(move |id| println!("click: {id} ({name})"));
        scene.add_sprite(rect, Some(TextureHandle(10 + index as u64)), handler)?;
    }
    Ok(scene)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Info => {
            println!("parallax-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", parallax_common::crate_info());
            println!("view: {}", parallax_view::crate_info());
            println!("input: {}", parallax_input::crate_info());
            println!("particles: {}", parallax_particles::crate_info());
            println!("render: {}", parallax_render::crate_info());
            println!("tools: {}", parallax_tools::crate_info());
        }
        Commands::Simulate {
            ticks,
            seed,
            config,
            script,
            width,
            height,
            frame,
            json,
        } => {
            let config = match config {
                Some(path) => SceneConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => SceneConfig::default(),
            };
            let mut scene = demo_scene(config, seed)?;
            scene.on_resize(width, height, 1.0)?;

            let mut schedule: BTreeMap<u64, Vec<InputEvent>> = BTreeMap::new();
            if let Some(path) = script {
                for step in load_script(&path)? {
                    schedule.entry(step.at).or_default().push(step.event);
                }
            }

            let mut backend = DebugTextBackend::new();
            let mut drawn = 0usize;
            let mut skipped = 0usize;
            for tick in 0..ticks {
                if let Some(events) = schedule.remove(&tick) {
                    for event in events {
                        if let Err(err) = event.dispatch(&mut scene) {
                            tracing::warn!(tick, ?event, %err, "scripted event rejected");
                        }
                    }
                }
                let report = scene.tick();
                tracing::debug!(
                    tick,
                    offset = report.offset,
                    spawned = report.spawned,
                    "tick"
                );
                let stats = scene.render(&mut backend);
                drawn += stats.drawn;
                skipped += stats.skipped_missing_texture;
            }
            if !schedule.is_empty() {
                tracing::warn!(
                    remaining = schedule.len(),
                    "script steps scheduled past the last tick were ignored"
                );
            }

            let summary = SceneInspector::summary(&scene);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
                println!("frames={} draws={drawn} skipped={skipped}", backend.frames());
                for sprite in SceneInspector::list_sprites(&scene) {
                    println!("  {sprite}");
                }
            }
            if frame {
                print!("{}", backend.output());
            }
        }
        Commands::ValidateConfig { path } => {
            let config = SceneConfig::load(&path)
                .with_context(|| format!("validating {}", path.display()))?;
            println!("{}: OK", path.display());
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
