use std::{fs, process};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use distance_scenes::{
    config::RenderConfig,
    player::Player,
    renderer::Recorder,
    scenes,
    types::PlayablePresentation,
};

/// Distance-metric scenes, rendered and played in the terminal.
#[derive(Parser)]
#[command(name = "distance-scenes", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in scenes.
    List,
    /// Render a scene to a presentation file.
    Render {
        scene: String,
        output: String,
        #[command(flatten)]
        output_shape: OutputShape,
    },
    /// Render a scene and play it straight away.
    Play {
        scene: String,
        #[command(flatten)]
        output_shape: OutputShape,
    },
    /// Play a previously rendered presentation.
    Open { path: String },
}

/// Overrides for the render config file.
#[derive(Args)]
struct OutputShape {
    #[arg(long)]
    fps: Option<u32>,
    #[arg(long)]
    width: Option<u16>,
    #[arg(long)]
    height: Option<u16>,
}

impl OutputShape {
    fn config(&self) -> Result<RenderConfig> {
        let mut config = RenderConfig::load();
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        config.validate().context("Invalid render options")?;
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::List => {
            for entry in scenes::list() {
                println!("{:<34} {}", entry.name, entry.about);
            }
            Ok(())
        }
        Command::Render {
            scene,
            output,
            output_shape,
        } => {
            let presentation = render(&scene, &output_shape.config()?)?;
            let json = serde_json::to_string_pretty(&presentation)?;
            fs::write(&output, &json).with_context(|| format!("Failed to write {output}"))?;
            eprintln!(
                "Rendered {} frames ({} steps) from {} -> {}",
                presentation.frames.len(),
                presentation.markers.len(),
                scene,
                output,
            );
            Ok(())
        }
        Command::Play {
            scene,
            output_shape,
        } => {
            let presentation = render(&scene, &output_shape.config()?)?;
            Player::new(presentation, scene).play()
        }
        Command::Open { path } => open(&path),
    }
}

fn render(name: &str, config: &RenderConfig) -> Result<PlayablePresentation> {
    let mut script = scenes::build(name)?;
    let mut recorder = Recorder::new();
    script
        .run(config, &mut recorder)
        .with_context(|| format!("Scene {} failed", script.name()))?;
    tracing::debug!(frames = recorder.frame_count(), "recorded");
    recorder.into_presentation()
}

fn open(path: &str) -> Result<()> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    let presentation: PlayablePresentation =
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {path}"))?;

    let mut player = Player::new(presentation, path);
    player.play()
}
