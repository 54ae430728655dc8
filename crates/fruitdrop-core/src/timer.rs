//! Deferred tasks keyed by session-clock due time.

use std::time::Duration;

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due: Duration,
    seq: u64,
    payload: T,
}

/// A queue of payloads that become ready at a given clock time.
///
/// Entries that are due at the same instant pop in scheduling order.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: Vec<Scheduled<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: Duration, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled { due, seq, payload });
    }

    /// Removes and returns every payload due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Vec<T> {
        let (mut ready, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|entry| entry.due <= now);
        self.entries = pending;
        ready.sort_by_key(|entry| (entry.due, entry.seq));
        ready.into_iter().map(|entry| entry.payload).collect()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
