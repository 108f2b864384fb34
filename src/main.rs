use anyhow::{Result, anyhow};
use clap::Parser;
use snake_minigame::game::GameConfig;
use snake_minigame::logging;
use snake_minigame::modes::PlayMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snake_minigame")]
#[command(version, about = "Arcade Snake in a terminal window")]
struct Cli {
    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in fullscreen mode
    #[arg(long)]
    fullscreen: bool,

    /// Tick period in milliseconds (overrides the config file)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (logging is off otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_period_ms = tick_ms;
        config
            .validate()
            .map_err(|msg| anyhow!("Invalid --tick-ms: {}", msg))?;
    }

    let mut play_mode = PlayMode::new(config, cli.seed, cli.fullscreen);
    play_mode.run().await?;

    Ok(())
}
