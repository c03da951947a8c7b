//! Scheduling port.
//!
//! Engines never own a clock. They register timers through a
//! [`Scheduler`] handed to every call and get a [`TimerId`] back; the host
//! later delivers expired ids to the engine that registered them. The
//! engine keeps its own table of ids, so a cancelled or foreign id is
//! simply not found.
//!
//! [`Timeline`] is the deterministic implementation used by the launcher
//! and by tests: time only moves when the host advances it.

mod timeline;

pub use timeline::Timeline;

use serde::{Deserialize, Serialize};

/// Milliseconds on the host's timeline.
pub type Millis = u64;

/// Opaque handle for a registered timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// Register and cancel one-shot timers.
pub trait Scheduler {
    /// Current time.
    fn now(&self) -> Millis;

    /// Register a timer due `delay_ms` from now.
    fn after(&mut self, delay_ms: Millis) -> TimerId;

    /// Cancel a timer. Returns false if it already fired or never existed.
    ///
    /// A cancelled timer is never delivered.
    fn cancel(&mut self, id: TimerId) -> bool;
}
