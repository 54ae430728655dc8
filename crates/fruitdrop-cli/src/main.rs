//! Fruitdrop headless runner
//!
//! Plays a session with a deterministic auto-player and logs the outcome.
//!
//! ```text
//! fruitdrop [--seed N] [--drops N] [--config path.json] [--verify]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use fruitdrop_core::{GameConfig, PHYSICS_DT, Session, SessionEvent};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Frames between two drops (0.6 s at 60 Hz).
const DROP_INTERVAL_FRAMES: u32 = 36;
/// Frames simulated after the last drop so pending merges settle.
const SETTLE_FRAMES: u32 = 180;

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless fruitdrop auto-player", long_about = None)]
struct Args {
    /// Seed for the spawn queue and the auto-player's pointer.
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Number of fruits to drop before letting the bin settle.
    #[arg(long, default_value_t = 60)]
    drops: u32,

    /// JSON file overriding the default game config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Play the same run twice and fail if the outcomes differ.
    #[arg(long)]
    verify: bool,
}

/// Summary of a finished run.
#[derive(Debug, PartialEq, Eq)]
struct Outcome {
    score: u64,
    fruits: usize,
    merges: usize,
    game_over: bool,
    hash: u64,
}

fn play(config: GameConfig, seed: u64, drops: u32) -> anyhow::Result<Outcome> {
    let mut session = Session::new(config, seed).context("invalid game config")?;
    let mut pointer = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
    let frame = Duration::from_secs_f32(PHYSICS_DT);
    let (left, right) = (session.config().bin_left, session.config().bin_right);

    let mut merges = 0;
    let mut dropped = 0;
    let mut frames = 0u32;
    let total_frames = drops * DROP_INTERVAL_FRAMES + SETTLE_FRAMES;

    while frames < total_frames && !session.is_game_over() {
        if frames % DROP_INTERVAL_FRAMES == 0 && dropped < drops {
            session.drop_at(pointer.random_range(left..right))?;
            dropped += 1;
        }
        session.tick(frame)?;
        frames += 1;

        for event in session.drain_events() {
            match event {
                SessionEvent::MergeCompleted { level, score, .. } => {
                    merges += 1;
                    tracing::debug!("merged into level {level}, score {score}");
                }
                SessionEvent::GameOver { score } => {
                    tracing::warn!("game over after {dropped} drops (score {score})");
                }
                _ => {}
            }
        }
    }

    let mut histogram = vec![0usize; session.levels().len()];
    for fruit in session.fruits() {
        histogram[usize::from(fruit.level)] += 1;
    }
    for (level, count) in session.levels().iter().zip(&histogram) {
        if *count > 0 {
            tracing::info!("  {:<12} x{}", level.label, count);
        }
    }

    let outcome = Outcome {
        score: session.score(),
        fruits: session.fruit_count(),
        merges,
        game_over: session.is_game_over(),
        hash: session.state_hash(),
    };
    session.teardown();
    Ok(outcome)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    tracing::info!("Playing seed {} with {} drops", args.seed, args.drops);
    let outcome = play(config.clone(), args.seed, args.drops)?;
    tracing::info!(
        "Finished: score={} fruits={} merges={} game_over={}",
        outcome.score,
        outcome.fruits,
        outcome.merges,
        outcome.game_over
    );

    if args.verify {
        let replay = play(config, args.seed, args.drops)?;
        if replay != outcome {
            bail!("replay diverged: {outcome:?} vs {replay:?}");
        }
        tracing::info!("Replay matched (hash {:016x})", outcome.hash);
    }

    Ok(())
}
