//! Configuration shared by every game.
//!
//! Each game resolves its settings once, at construction. Settings are
//! plain serde structs with `#[serde(default)]`, so a host can load a
//! partial JSON document and get the stock tuning for everything it
//! leaves out.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Settings that can be checked before a game is built.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Options common to every game's match flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for the game's RNG. Same seed produces the same match.
    pub seed: u64,

    /// How long the `Resolved` display lasts before the engine moves on.
    pub resolve_display_ms: u64,

    /// Start the next round as soon as the previous one has been shown.
    /// When false the engine waits in `Idle` for `start()`.
    pub auto_advance: bool,

    /// Presentation hint: how long a tap flash should stay visible.
    pub tap_effect_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            resolve_display_ms: 2000,
            auto_advance: true,
            tap_effect_ms: 150,
        }
    }
}

impl MatchConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_resolve_display(mut self, ms: u64) -> Self {
        self.resolve_display_ms = ms;
        self
    }

    #[must_use]
    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    #[must_use]
    pub fn with_tap_effect(mut self, ms: u64) -> Self {
        self.tap_effect_ms = ms;
        self
    }
}

impl Validate for MatchConfig {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.tap_effect_ms <= 10_000,
            "tap effect of {}ms would outlast any round",
            self.tap_effect_ms
        );
        Ok(())
    }
}
