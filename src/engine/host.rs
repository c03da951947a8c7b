//! Collaborators the engine calls into: a result reporter and a
//! presentation layer that renders snapshots.

use serde::{Deserialize, Serialize};

use super::outcome::Report;
use super::Input;
use crate::core::{Phase, Player, PlayerMap};
use crate::games::{GameKind, Payload};
use crate::timing::Millis;

/// Receives round and match results.
///
/// Called at most once per terminal transition, and never after the
/// game has been disposed.
pub trait Reporter {
    fn on_result(&mut self, report: &Report);
}

impl<F: FnMut(&Report)> Reporter for F {
    fn on_result(&mut self, report: &Report) {
        self(report)
    }
}

/// Renders game state. Called after every accepted operation.
pub trait Presenter {
    fn render(&mut self, snapshot: &Snapshot);
}

impl<F: FnMut(&Snapshot)> Presenter for F {
    fn render(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// The last input the engine accepted, for tap effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMark {
    pub player: Player,
    pub input: Input,
    pub at: Millis,
}

/// Read-only view of a game for the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub kind: GameKind,
    pub phase: Phase,
    pub round: u32,
    pub scores: PlayerMap<i64>,
    /// Players whose action for this round is already in.
    pub locked: PlayerMap<bool>,
    pub last_input: Option<InputMark>,
    /// How long a tap flash should stay visible.
    pub tap_effect_ms: u64,
    pub now: Millis,
    pub payload: Payload,
}

impl Snapshot {
    /// Whether a tap flash for `player` should still be showing.
    #[must_use]
    pub fn tap_flash(&self, player: Player) -> bool {
        self.last_input
            .is_some_and(|mark| mark.player == player && self.now < mark.at.saturating_add(self.tap_effect_ms))
    }
}
