//! Keyed debouncing of recalculation requests.
//!
//! Each key owns at most one pending deadline. Rescheduling a key pushes its
//! deadline out and cancels the earlier run, so a burst of edits to the same
//! field collapses into one recalculation fired after the quiescence delay.
//! Different keys are tracked independently.
//!
//! The debouncer holds no timers of its own: the session loop asks for
//! [`Debouncer::next_deadline`], sleeps until then, and drains the due keys
//! with [`Debouncer::take_due`]. That keeps it deterministic under test.

use std::{collections::HashMap, fmt, hash::Hash, time::Duration};

use tokio::time::Instant;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    delay: Duration,
    pending: HashMap<K, Instant>,
}

impl<K> Debouncer<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)schedules `key` to fire `delay` after `now`.
    ///
    /// Returns `true` if an earlier pending run for the same key was
    /// cancelled.
    pub fn schedule(
        &mut self,
        key: K,
        now: Instant,
    ) -> bool {
        let replaced = self.pending.insert(key, now + self.delay).is_some();
        trace!(?key, replaced, "Scheduled debounced recalculation");
        replaced
    }

    /// Drops the pending run for `key`, if any.
    pub fn cancel(
        &mut self,
        key: &K,
    ) -> bool {
        self.pending.remove(key).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(
        &self,
        key: &K,
    ) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Removes and returns every key whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_due(
        &mut self,
        now: Instant,
    ) -> Vec<K> {
        let mut due: Vec<(K, Instant)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*key, *deadline))
            .collect();
        due.sort_by_key(|(_, deadline)| *deadline);

        for (key, _) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(key, _)| key).collect()
    }
}
