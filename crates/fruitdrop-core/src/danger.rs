//! Danger zone monitor.
//!
//! Ends the session once the same set of fruits has stayed above the danger
//! line for longer than the dwell threshold. Any change in that set restarts
//! the clock, and an empty set clears it.

use std::collections::HashSet;
use std::time::Duration;

use crate::fruit::{Fruit, FruitId};
use crate::level::LevelTable;

/// Outcome of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerVerdict {
    Clear,
    /// A new violating set was seen and the dwell clock restarted.
    Entered,
    /// The same set is still violating.
    Dwelling { elapsed: Duration },
    /// The dwell threshold was exceeded.
    Triggered,
}

#[derive(Debug, Clone)]
pub struct DangerMonitor {
    line_y: f32,
    dwell: Duration,
    current: HashSet<FruitId>,
    dwell_start: Option<Duration>,
}

impl DangerMonitor {
    pub fn new(line_y: f32, dwell: Duration) -> Self {
        Self {
            line_y,
            dwell,
            current: HashSet::new(),
            dwell_start: None,
        }
    }

    /// Whether a fruit's top edge is at or above the line. Merging fruits never count.
    pub fn violates(&self, fruit: &Fruit, radius: f32) -> bool {
        !fruit.is_merging && fruit.position[1] - radius <= self.line_y
    }

    /// Collects the ids of every violating fruit.
    pub fn violating_set<'a>(
        &self,
        fruits: impl IntoIterator<Item = &'a Fruit>,
        levels: &LevelTable,
    ) -> HashSet<FruitId> {
        fruits
            .into_iter()
            .filter(|fruit| {
                levels
                    .get(fruit.level)
                    .is_some_and(|level| self.violates(fruit, level.radius))
            })
            .map(|fruit| fruit.id)
            .collect()
    }

    /// Feeds one frame's violating set observed at `now`.
    pub fn sample(&mut self, violating: HashSet<FruitId>, now: Duration) -> DangerVerdict {
        if violating.is_empty() {
            self.clear();
            return DangerVerdict::Clear;
        }

        if violating != self.current {
            self.current = violating;
            self.dwell_start = Some(now);
            tracing::debug!("[danger] {} fruit(s) above the line", self.current.len());
            return DangerVerdict::Entered;
        }

        let Some(start) = self.dwell_start else {
            self.dwell_start = Some(now);
            return DangerVerdict::Dwelling {
                elapsed: Duration::ZERO,
            };
        };

        let elapsed = now.saturating_sub(start);
        if elapsed > self.dwell {
            DangerVerdict::Triggered
        } else {
            DangerVerdict::Dwelling { elapsed }
        }
    }

    pub fn clear(&mut self) {
        self.current.clear();
        self.dwell_start = None;
    }

    pub fn current(&self) -> &HashSet<FruitId> {
        &self.current
    }

    pub fn dwell_start(&self) -> Option<Duration> {
        self.dwell_start
    }

    pub fn line_y(&self) -> f32 {
        self.line_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier2d::prelude::RigidBodyHandle;

    const DWELL: Duration = Duration::from_millis(1000);

    fn id(index: u32) -> FruitId {
        FruitId(RigidBodyHandle::from_raw_parts(index, 0))
    }

    fn set(ids: &[u32]) -> HashSet<FruitId> {
        ids.iter().copied().map(id).collect()
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    /// Samples `ids` every 16ms over `[from, to]` and returns the first trigger time.
    fn hold(monitor: &mut DangerMonitor, ids: &[u32], from: u64, to: u64) -> Option<u64> {
        let mut t = from;
        while t <= to {
            if monitor.sample(set(ids), ms(t)) == DangerVerdict::Triggered {
                return Some(t);
            }
            t += 16;
        }
        None
    }

    #[test]
    fn test_violation_uses_top_edge() {
        let monitor = DangerMonitor::new(100.0, DWELL);
        let mut fruit = Fruit {
            id: id(0),
            level: 0,
            is_merging: false,
            position: [50.0, 120.0],
            created_at: Duration::ZERO,
        };
        assert!(monitor.violates(&fruit, 20.0));
        assert!(!monitor.violates(&fruit, 19.0));

        fruit.is_merging = true;
        assert!(!monitor.violates(&fruit, 20.0));
    }

    #[test]
    fn test_triggers_after_stable_dwell() {
        let mut monitor = DangerMonitor::new(100.0, DWELL);
        let triggered = hold(&mut monitor, &[1], 0, 2000).unwrap();
        assert!(triggered > 1000);
        assert!(triggered <= 1024);
    }

    #[test]
    fn test_empty_set_clears_state() {
        let mut monitor = DangerMonitor::new(100.0, DWELL);
        monitor.sample(set(&[1]), ms(0));
        assert_eq!(monitor.sample(HashSet::new(), ms(500)), DangerVerdict::Clear);
        assert!(monitor.current().is_empty());
        assert_eq!(monitor.dwell_start(), None);
        assert_eq!(monitor.sample(set(&[1]), ms(600)), DangerVerdict::Entered);
    }

    #[test]
    fn test_membership_change_restarts_clock() {
        let mut monitor = DangerMonitor::new(100.0, DWELL);
        assert_eq!(hold(&mut monitor, &[1, 2], 0, 800), None);
        // One fruit leaves while the other stays.
        assert_eq!(monitor.sample(set(&[2]), ms(816)), DangerVerdict::Entered);
        assert_eq!(hold(&mut monitor, &[2], 832, 1800), None);
        assert!(hold(&mut monitor, &[2], 1816, 1900).is_some());
    }

    #[test]
    fn test_transient_spike_is_ignored() {
        let mut monitor = DangerMonitor::new(100.0, DWELL);
        for cycle in 0..10u64 {
            let base = cycle * 600;
            assert_eq!(hold(&mut monitor, &[1], base, base + 400), None);
            monitor.sample(HashSet::new(), ms(base + 500));
        }
    }

    #[test]
    fn test_leave_and_return_counts_from_return() {
        let mut monitor = DangerMonitor::new(100.0, DWELL);
        assert_eq!(hold(&mut monitor, &[1], 0, 480), None);
        assert_eq!(monitor.sample(HashSet::new(), ms(500)), DangerVerdict::Clear);

        let returned_at = 700;
        assert_eq!(hold(&mut monitor, &[1], returned_at, returned_at + 1000), None);
        let triggered = hold(&mut monitor, &[1], returned_at + 1008, returned_at + 1200).unwrap();
        assert!(triggered - returned_at > 1000);
        assert!(triggered - returned_at <= 1200);
    }
}
