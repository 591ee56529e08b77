use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verdant_core::Size;
use verdant_reveal::EngineConfig;

mod simulate;

#[derive(Parser)]
#[command(name = "verdant")]
#[command(author, version, about = "Headless scroll reveal simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scroll a page containing one line of text and print the reveal
    Simulate {
        /// Text to reveal
        #[arg(short, long, default_value = "go green now")]
        text: String,
        /// Number of frames to run (60 per second)
        #[arg(short, long, default_value_t = 240)]
        frames: u32,
        /// Wheel delta applied every frame (px)
        #[arg(short, long, default_value_t = 12.0)]
        step: f32,
        /// Viewport size as WIDTHxHEIGHT
        #[arg(long, default_value = "1280x800", value_parser = parse_viewport)]
        viewport: Size,
        /// Engine config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print every Nth frame
        #[arg(long, default_value_t = 20)]
        every: u32,
    },
    /// Print the effective engine config as TOML
    Config {
        /// Engine config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            text,
            frames,
            step,
            viewport,
            config,
            every,
        } => {
            let config = load_config(config.as_deref())?;
            simulate::run(simulate::Options {
                text,
                frames,
                step,
                viewport,
                every: every.max(1),
                config,
            })
            .await
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            let text = config.to_toml().context("failed to serialize config")?;
            print!("{text}");
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn parse_viewport(value: &str) -> Result<Size, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| *v > 0.0)
            .ok_or_else(|| format!("invalid viewport dimension {part:?}"))
    };
    Ok(Size::new(parse(width)?, parse(height)?))
}
