//! Fruitdrop Core Library
//!
//! Gameplay core of a falling-fruit merge game on top of `Rapier2D`:
//! same-level fruits that touch fuse into the next level, and a session ends
//! once fruits stay above the danger line for too long.
//!
//! Rendering and input are left to the host, which reads [`Session::bodies`]
//! and calls [`Session::drop`], [`Session::toggle_pause`] and [`Session::reset`].

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod danger;
pub mod error;
pub mod fruit;
pub mod level;
pub mod merge;
pub mod physics;
pub mod session;
pub mod spawn;
pub mod tag;
pub mod timer;
pub mod walls;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{FruitMaterial, GameConfig};
pub use danger::{DangerMonitor, DangerVerdict};
pub use error::{ConfigError, GameError};
pub use fruit::{Fruit, FruitId, FruitLifecycle};
pub use level::{Color, Level, LevelIndex, LevelTable, MAX_LEVELS, merge_score};
pub use merge::{MergeCompletion, MergeController, MergeResolution};
pub use physics::{CollisionPair, PHYSICS_DT, PhysicsWorld, default_gravity};
pub use session::{BodyView, Preview, Session, SessionEvent, SessionPhase};
pub use spawn::SpawnController;
pub use tag::{BodyTag, FruitTag, WallKind};
pub use walls::WallRect;
