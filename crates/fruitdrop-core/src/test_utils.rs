//! Test utilities for driving a session frame by frame.
//!
//! Provides `TestSession`, a wrapper around [`Session`] that advances the
//! session clock in exact physics timesteps so scenarios are deterministic.

use std::time::Duration;

use crate::config::GameConfig;
use crate::physics::PHYSICS_DT;
use crate::session::{Session, SessionEvent};

/// Length of one simulated frame.
pub(crate) fn frame() -> Duration {
    Duration::from_secs_f32(PHYSICS_DT)
}

pub(crate) struct TestSession {
    pub session: Session,
}

impl TestSession {
    /// Create a session with the default config and seed.
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self {
            session: Session::new(config, 12345).expect("test config must be valid"),
        }
    }

    /// A config whose spawn queue only ever yields level 0.
    pub fn smallest_only() -> GameConfig {
        GameConfig {
            spawn_pool: 1,
            ..GameConfig::default()
        }
    }

    /// Run `n` full frames.
    pub fn step(&mut self, n: usize) {
        for _ in 0..n {
            self.session.tick(frame()).expect("tick failed");
        }
    }

    /// Run frames until `done` holds or `max_frames` elapse. Returns whether `done` held.
    pub fn step_until(&mut self, max_frames: usize, done: impl Fn(&Session) -> bool) -> bool {
        for _ in 0..max_frames {
            if done(&self.session) {
                return true;
            }
            self.step(1);
        }
        done(&self.session)
    }

    pub fn events(&mut self) -> Vec<SessionEvent> {
        self.session.drain_events()
    }
}
