//! The shared phase graph every game walks through.
//!
//! ```text
//!            start                 go-signal            resolve
//!   Idle ──────────▶ Setup ─────────────────▶ Active ──────────▶ Resolved
//!    ▲                 │                                            │
//!    │                 └──────── foul (early input) ───────────────▶│
//!    │                                                               │
//!    └──────────────── next round ◀──────────────┬─── match over ───┘
//!                                                 ▼
//!   Ended ──── start (new match) ────▶ Setup     Ended
//! ```

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a running game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for a start command.
    #[default]
    Idle,
    /// Randomizing and revealing; gameplay input not yet accepted.
    Setup,
    /// Accepting gameplay input.
    Active,
    /// Round outcome computed; transient display state.
    Resolved,
    /// Match complete; terminal until restarted.
    Ended,
}

impl Phase {
    /// Whether the graph has an edge from `self` to `next`.
    #[must_use]
    pub fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Idle, Phase::Setup)
                | (Phase::Ended, Phase::Setup)
                | (Phase::Setup, Phase::Active)
                | (Phase::Setup, Phase::Resolved)
                | (Phase::Active, Phase::Resolved)
                | (Phase::Resolved, Phase::Idle)
                | (Phase::Resolved, Phase::Ended)
        )
    }

    /// Phases from which `start()` is honoured.
    #[must_use]
    pub fn accepts_start(self) -> bool {
        matches!(self, Phase::Idle | Phase::Ended)
    }

    /// Phases in which the round is still being played.
    #[must_use]
    pub fn in_round(self) -> bool {
        matches!(self, Phase::Setup | Phase::Active)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Setup => "setup",
            Phase::Active => "active",
            Phase::Resolved => "resolved",
            Phase::Ended => "ended",
        };
        f.write_str(name)
    }
}
