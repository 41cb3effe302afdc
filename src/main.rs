use std::path::PathBuf;

use clap::Parser;
use tic_tac_toe::{term, Config, Difficulty, GameController, Marker};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play tic-tac-toe against the computer in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// RON file with the starting settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// easy, intermediate or pro.
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// The marker you play, x or o.
    #[arg(long)]
    marker: Option<Marker>,

    /// How long the computer thinks before moving, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(marker) = cli.marker {
        config.user_marker = marker;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.thinking_delay_ms = delay_ms;
    }
    info!(?config, "starting");

    let controller = GameController::new(config).await?;
    term::play(controller).await
}
