//! Error types.
//!
//! [`GameError`] variants are all invariant violations: they cannot occur while
//! callers honor the component contracts, and a host should treat them as
//! fatal. Expected no-ops (dropping while paused, terminal-level collisions)
//! are never reported as errors.

use crate::fruit::FruitId;
use crate::level::LevelIndex;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Fruit {0:?} is not present in the physics world")]
    FruitNotFound(FruitId),

    #[error("Body {0:?} does not carry a fruit tag")]
    NotAFruit(FruitId),

    #[error("Level {level} is outside the level table (len {len})")]
    LevelOutOfRange { level: LevelIndex, len: usize },

    #[error("Cannot merge fruits of different levels ({a} and {b})")]
    LevelMismatch { a: LevelIndex, b: LevelIndex },

    #[error("Fruit {0:?} is already locked into a pending merge")]
    AlreadyPending(FruitId),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
