//! # party-duel
//!
//! Round engines for two-player, single-device party minigames.
//!
//! ## Design Principles
//!
//! 1. **One Engine, Many Games**: The phase graph, scores, locks, timers
//!    and reporting live in a single generic [`Engine`]. Each game is a
//!    small [`Rules`] policy.
//!
//! 2. **No Ambient Clock**: Engines schedule through a [`Scheduler`]
//!    handed to every call. [`Timeline`] is a deterministic virtual clock,
//!    so any match can be replayed exactly from its seed.
//!
//! 3. **Mistakes Are No-ops**: A tap in the wrong phase, a second tap,
//!    or a stale timer never fails. Only construction can fail.
//!
//! ## Modules
//!
//! - `core`: players, per-player storage, RNG, phases, shared configuration
//! - `timing`: the scheduling port and the virtual `Timeline`
//! - `engine`: the generic round engine, outcomes and host collaborators
//! - `games`: Reflex Battle, Number Duel, Pattern Memory, Tap Rush, Just Fit
//! - `launcher`: runs one game at a time

pub mod core;
pub mod timing;
pub mod engine;
pub mod games;
pub mod launcher;

// Re-export commonly used types
pub use crate::core::{GameRng, MatchConfig, Phase, Player, PlayerMap, Validate};

pub use crate::timing::{Millis, Scheduler, TimerId, Timeline};

pub use crate::engine::{
    Engine, Game, Input, InputMark, MatchResult, Outcome, Presenter, Report, Reporter, RoundCtx,
    RoundResult, Rules, Side, Snapshot, Verdict,
};

pub use crate::games::{
    CompareGame, CompareRules, CompareSettings, GameKind, JustFitGame, JustFitRules, JustFitSettings,
    MashGame, MashRules, MashSettings, MemoryGame, MemoryRules, MemorySettings, Payload, ReflexGame,
    ReflexRules, ReflexSettings,
};

pub use crate::launcher::{Launcher, LauncherConfig};
