//! Merge controller.
//!
//! Turns same-level collisions into a higher-level fruit. A merge is committed
//! immediately (both sources leave the world) and completed after a short
//! delay, when the replacement fruit is inserted and points are awarded.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::GameError;
use crate::fruit::{self, Fruit, FruitId, FruitLifecycle};
use crate::level::{LevelIndex, LevelTable, merge_score};
use crate::physics::{CollisionPair, PhysicsWorld};
use crate::timer::TimerQueue;

/// A committed merge waiting for its replacement fruit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeCompletion {
    pub sources: [FruitId; 2],
    pub level: LevelIndex,
    pub point: [f32; 2],
    /// World generation at commit time.
    pub generation: u64,
}

/// Result of firing a scheduled completion.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeResolution {
    Completed {
        sources: [FruitId; 2],
        fruit: Fruit,
        points: u64,
    },
    /// The world was reset after the merge was committed.
    Stale { sources: [FruitId; 2] },
}

#[derive(Debug, Clone)]
pub struct MergeController {
    pending: HashSet<FruitId>,
    completions: TimerQueue<MergeCompletion>,
    delay: Duration,
}

impl MergeController {
    pub fn new(delay: Duration) -> Self {
        Self {
            pending: HashSet::new(),
            completions: TimerQueue::new(),
            delay,
        }
    }

    /// Ids currently locked into an in-flight merge.
    pub fn pending(&self) -> &HashSet<FruitId> {
        &self.pending
    }

    pub fn is_pending(&self, id: FruitId) -> bool {
        self.pending.contains(&id)
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.completions.next_due()
    }

    /// Forgets every pending id. Scheduled completions stay queued and are
    /// discarded by their generation check when they fire.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Handles one step's collision batch in report order and returns the
    /// merges committed by it.
    pub fn process_batch(
        &mut self,
        world: &mut PhysicsWorld,
        levels: &LevelTable,
        lifecycle: &FruitLifecycle,
        pairs: &[CollisionPair],
        now: Duration,
        generation: u64,
    ) -> Result<Vec<MergeCompletion>, GameError> {
        let mut committed = Vec::new();
        for pair in pairs {
            let (Some(a), Some(b)) = (fruit::try_get(world, pair.a), fruit::try_get(world, pair.b))
            else {
                continue;
            };
            if !self.accepts(levels, &a, &b) {
                continue;
            }
            committed.push(self.commit(world, lifecycle, a.id, b.id, now, generation)?);
        }
        Ok(committed)
    }

    fn accepts(&self, levels: &LevelTable, a: &Fruit, b: &Fruit) -> bool {
        if a.id == b.id || a.level != b.level {
            return false;
        }
        if a.is_merging || b.is_merging || self.is_pending(a.id) || self.is_pending(b.id) {
            tracing::trace!("[merge] {:?}/{:?} already claimed", a.id, b.id);
            return false;
        }
        if levels.is_terminal(a.level) {
            tracing::trace!("[merge] ignoring terminal-level pair at level {}", a.level);
            return false;
        }
        true
    }

    /// Locks both fruits, removes them from the world and schedules the
    /// replacement at their midpoint.
    pub fn commit(
        &mut self,
        world: &mut PhysicsWorld,
        lifecycle: &FruitLifecycle,
        a: FruitId,
        b: FruitId,
        now: Duration,
        generation: u64,
    ) -> Result<MergeCompletion, GameError> {
        let first = fruit::get(world, a)?;
        let second = fruit::get(world, b)?;
        if first.level != second.level {
            return Err(GameError::LevelMismatch {
                a: first.level,
                b: second.level,
            });
        }

        if a == b {
            return Err(GameError::AlreadyPending(a));
        }
        if let Some(claimed) = [&first, &second]
            .into_iter()
            .find(|f| f.is_merging || self.is_pending(f.id))
        {
            return Err(GameError::AlreadyPending(claimed.id));
        }

        for id in [a, b] {
            fruit::set_merging(world, id, true)?;
            self.pending.insert(id);
        }

        let point = [
            (first.position[0] + second.position[0]) / 2.0,
            (first.position[1] + second.position[1]) / 2.0,
        ];

        lifecycle.destroy(world, a)?;
        lifecycle.destroy(world, b)?;

        let completion = MergeCompletion {
            sources: [a, b],
            level: first.level,
            point,
            generation,
        };
        self.completions.schedule(now + self.delay, completion);

        tracing::debug!(
            "[merge] committed level {} at ({:.1}, {:.1})",
            first.level,
            point[0],
            point[1]
        );
        Ok(completion)
    }

    /// Pops every completion due at `now` without resolving it.
    pub fn take_due(&mut self, now: Duration) -> Vec<MergeCompletion> {
        self.completions.pop_due(now)
    }

    /// Inserts the replacement fruit for a completion, or discards it when the
    /// world generation has moved on.
    pub fn complete(
        &mut self,
        world: &mut PhysicsWorld,
        levels: &LevelTable,
        lifecycle: &FruitLifecycle,
        completion: MergeCompletion,
        now: Duration,
        generation: u64,
    ) -> Result<MergeResolution, GameError> {
        if completion.generation != generation {
            tracing::debug!(
                "[merge] discarding stale completion from generation {} (now {})",
                completion.generation,
                generation
            );
            return Ok(MergeResolution::Stale {
                sources: completion.sources,
            });
        }

        let fruit = lifecycle.spawn(world, levels, completion.level + 1, completion.point, now)?;
        for id in completion.sources {
            self.pending.remove(&id);
        }

        Ok(MergeResolution::Completed {
            sources: completion.sources,
            fruit,
            points: merge_score(completion.level),
        })
    }
}
