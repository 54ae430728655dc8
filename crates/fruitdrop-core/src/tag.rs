//! Body tags stored in rapier's `user_data`.
//!
//! Layout of the `u128`:
//! - bits 120..128: type tag (0 = untagged)
//! - bits 112..120: fruit level
//! - bit 111: fruit merging flag
//! - bits 0..64: fruit creation time in milliseconds, or the wall kind

use serde::{Deserialize, Serialize};

use crate::level::LevelIndex;

/// Type tags for user_data encoding.
pub const USER_DATA_FRUIT: u8 = 1;
pub const USER_DATA_WALL: u8 = 2;

const TYPE_SHIFT: u32 = 120;
const LEVEL_SHIFT: u32 = 112;
const MERGING_BIT: u128 = 1 << 111;
const LOW_MASK: u128 = u64::MAX as u128;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WallKind {
    Floor,
    Left,
    Right,
}

impl WallKind {
    pub const ALL: [WallKind; 3] = [WallKind::Floor, WallKind::Left, WallKind::Right];

    fn code(self) -> u64 {
        match self {
            Self::Floor => 0,
            Self::Left => 1,
            Self::Right => 2,
        }
    }

    fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Floor),
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            _ => None,
        }
    }
}

/// Custom tags carried by a fruit body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FruitTag {
    pub level: LevelIndex,
    pub merging: bool,
    pub created_at_ms: u64,
}

/// What a physics body represents to the game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BodyTag {
    Fruit(FruitTag),
    Wall(WallKind),
}

impl BodyTag {
    pub fn encode(self) -> u128 {
        match self {
            Self::Fruit(tag) => {
                let mut data = (u128::from(USER_DATA_FRUIT) << TYPE_SHIFT)
                    | (u128::from(tag.level) << LEVEL_SHIFT)
                    | u128::from(tag.created_at_ms);
                if tag.merging {
                    data |= MERGING_BIT;
                }
                data
            }
            Self::Wall(kind) => {
                (u128::from(USER_DATA_WALL) << TYPE_SHIFT) | u128::from(kind.code())
            }
        }
    }

    /// Decodes user_data; untagged or unknown data yields `None`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn decode(user_data: u128) -> Option<Self> {
        let type_tag = (user_data >> TYPE_SHIFT) as u8;
        let low = (user_data & LOW_MASK) as u64;
        match type_tag {
            USER_DATA_FRUIT => Some(Self::Fruit(FruitTag {
                level: (user_data >> LEVEL_SHIFT) as u8,
                merging: user_data & MERGING_BIT != 0,
                created_at_ms: low,
            })),
            USER_DATA_WALL => WallKind::from_code(low).map(Self::Wall),
            _ => None,
        }
    }

    pub fn as_fruit(self) -> Option<FruitTag> {
        match self {
            Self::Fruit(tag) => Some(tag),
            Self::Wall(_) => None,
        }
    }
}
