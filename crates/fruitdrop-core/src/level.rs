//! Level table: the ordered fruit tiers with their size and visuals.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Index into the [`LevelTable`].
pub type LevelIndex = u8;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// A single fruit tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Level {
    pub label: String,
    pub radius: f32,
    pub color: Color,
}

impl Level {
    pub fn new(label: impl Into<String>, radius: f32, color: Color) -> Self {
        Self {
            label: label.into(),
            radius,
            color,
        }
    }
}

/// Ordered, immutable list of levels. The last entry is the terminal tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct LevelTable {
    levels: Vec<Level>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::classic()
    }
}

impl LevelTable {
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// The eleven-tier table from cherry to watermelon.
    pub fn classic() -> Self {
        Self::new(vec![
            Level::new("Cherry", 15.0, Color::rgb(220, 20, 60)),
            Level::new("Strawberry", 21.0, Color::rgb(255, 82, 82)),
            Level::new("Grape", 28.0, Color::rgb(142, 68, 173)),
            Level::new("Dekopon", 34.0, Color::rgb(255, 179, 71)),
            Level::new("Persimmon", 42.0, Color::rgb(255, 127, 39)),
            Level::new("Apple", 51.0, Color::rgb(231, 76, 60)),
            Level::new("Pear", 60.0, Color::rgb(241, 227, 107)),
            Level::new("Peach", 70.0, Color::rgb(255, 182, 193)),
            Level::new("Pineapple", 82.0, Color::rgb(244, 208, 63)),
            Level::new("Melon", 95.0, Color::rgb(163, 228, 120)),
            Level::new("Watermelon", 110.0, Color::rgb(39, 174, 96)),
        ])
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, level: LevelIndex) -> Option<&Level> {
        self.levels.get(usize::from(level))
    }

    /// Looks up a level, treating an out-of-range index as an invariant violation.
    pub fn level(&self, level: LevelIndex) -> Result<&Level, GameError> {
        self.get(level).ok_or(GameError::LevelOutOfRange {
            level,
            len: self.levels.len(),
        })
    }

    pub fn radius(&self, level: LevelIndex) -> Result<f32, GameError> {
        self.level(level).map(|l| l.radius)
    }

    /// Index of the terminal (non-mergeable) tier.
    #[allow(clippy::cast_possible_truncation)]
    pub fn max_level(&self) -> LevelIndex {
        self.levels.len().saturating_sub(1) as LevelIndex
    }

    pub fn is_terminal(&self, level: LevelIndex) -> bool {
        !self.levels.is_empty() && level == self.max_level()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    pub fn largest_radius(&self) -> f32 {
        self.levels.iter().map(|l| l.radius).fold(0.0, f32::max)
    }
}

/// Most levels a table may hold. The award for the highest merge, `2^63`,
/// still fits in a `u64`.
pub const MAX_LEVELS: usize = 64;

/// Points awarded for creating a fruit of `level + 1`. Saturates past
/// [`MAX_LEVELS`].
pub fn merge_score(level: LevelIndex) -> u64 {
    1u64.checked_shl(u32::from(level) + 1).unwrap_or(u64::MAX)
}
