//! Virtual clock with an ordered timer queue.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use super::{Millis, Scheduler, TimerId};

/// Deterministic single-threaded timeline.
///
/// Timers are delivered in due-time order; timers due at the same instant
/// are delivered in registration order. Delivery runs to completion
/// before the next timer is considered, so a callback may register or
/// cancel timers and the run honours that.
///
/// ```
/// use party_duel::timing::{Scheduler, Timeline};
///
/// let mut timeline = Timeline::new();
/// let late = timeline.after(300);
/// let early = timeline.after(100);
///
/// let mut fired = Vec::new();
/// timeline.run_until(500, |_, id| fired.push(id));
/// assert_eq!(fired, vec![early, late]);
/// assert_eq!(timeline.now(), 500);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    now: Millis,
    next_id: u64,
    queue: BTreeSet<(Millis, TimerId)>,
    due_at: FxHashMap<TimerId, Millis>,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at `now` instead of zero.
    #[must_use]
    pub fn starting_at(now: Millis) -> Self {
        Self { now, ..Self::default() }
    }

    /// Number of timers still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_due(&self) -> Option<Millis> {
        self.queue.first().map(|&(due, _)| due)
    }

    /// Deliver every timer due at or before `target`, then park the clock
    /// at `target`.
    ///
    /// The clock is set to each timer's due time before `deliver` runs.
    pub fn run_until(&mut self, target: Millis, mut deliver: impl FnMut(&mut Self, TimerId)) {
        while let Some(&(due, id)) = self.queue.first() {
            if due > target {
                break;
            }
            self.queue.remove(&(due, id));
            self.due_at.remove(&id);
            self.now = self.now.max(due);
            log::trace!("{} fired at {}ms", id, self.now);
            deliver(self, id);
        }
        self.now = self.now.max(target);
    }

    /// Move the clock forward by `ms`, delivering what falls due.
    pub fn advance(&mut self, ms: Millis, deliver: impl FnMut(&mut Self, TimerId)) {
        let target = self.now.saturating_add(ms);
        self.run_until(target, deliver);
    }
}

impl Scheduler for Timeline {
    fn now(&self) -> Millis {
        self.now
    }

    fn after(&mut self, delay_ms: Millis) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let due = self.now.saturating_add(delay_ms);
        self.queue.insert((due, id));
        self.due_at.insert(id, due);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_at.remove(&id) {
            Some(due) => self.queue.remove(&(due, id)),
            None => false,
        }
    }
}
