//! Core types: players, RNG, phases, shared configuration.
//!
//! These are the building blocks every game shares. Games plug their
//! own rules into the engine rather than modifying the core.

pub mod player;
pub mod rng;
pub mod phase;
pub mod config;

pub use player::{Player, PlayerMap};
pub use rng::GameRng;
pub use phase::Phase;
pub use config::{MatchConfig, Validate};
