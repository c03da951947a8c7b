//! The round engine shared by every game.
//!
//! ## Architecture
//!
//! - [`Engine`] owns the phase graph (`Idle → Setup → Active → Resolved →
//!   Idle | Ended`), the match scores, per-round player locks, the timers
//!   it registered, and the reporter/presenter collaborators.
//! - A [`Rules`] policy supplies the payload for one game: round setup,
//!   timer meaning, input judgement and match termination.
//! - [`Game`] erases the policy type so the launcher can hold any game.
//!
//! ## Event flow
//!
//! ```text
//! pointer input ─▶ submit_input ─┐
//! timer expiry  ─▶ fire         ─┼─▶ Rules ─▶ transition + outcome ─▶ Reporter
//! animation     ─▶ tick         ─┘                                 └─▶ Presenter
//! ```

mod host;
mod machine;
mod outcome;
mod rules;

pub use host::{InputMark, Presenter, Reporter, Snapshot};
pub use machine::Engine;
pub use outcome::{MatchResult, Outcome, Report, RoundResult};
pub use rules::{RoundCtx, Rules};

use serde::{Deserialize, Serialize};

use crate::core::{Phase, Player};
use crate::games::GameKind;
use crate::timing::{Millis, Scheduler, TimerId};

/// Which of two presented values a player picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// A player's action, as delivered by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Input {
    /// Tap anywhere in the player's area.
    Tap,
    /// Pick one of two values.
    Pick(Side),
    /// Press one of the numbered boxes.
    Press(u8),
}

/// How the engine judged a single input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Not accepted in the current state; nothing changed.
    Ignored,
    /// Accepted without a right/wrong judgement (e.g. a counted tap).
    Accepted,
    Correct,
    Wrong,
    /// Early input; the round goes to the opponent.
    Foul,
    /// Accepted and worth this many points.
    Scored(i64),
}

impl Verdict {
    #[must_use]
    pub fn is_ignored(self) -> bool {
        self == Verdict::Ignored
    }
}

/// Object-safe view of an [`Engine`] for hosts that switch between games.
pub trait Game {
    fn kind(&self) -> GameKind;
    fn phase(&self) -> Phase;
    fn start(&mut self, sched: &mut dyn Scheduler);
    fn submit_input(&mut self, sched: &mut dyn Scheduler, player: Player, input: Input) -> Verdict;
    fn tick(&mut self, sched: &mut dyn Scheduler);
    fn fire(&mut self, sched: &mut dyn Scheduler, id: TimerId) -> bool;
    fn dispose(&mut self, sched: &mut dyn Scheduler);
    fn is_disposed(&self) -> bool;
    fn snapshot(&self, now: Millis) -> Snapshot;
}

impl<R: Rules + 'static> Game for Engine<R> {
    fn kind(&self) -> GameKind {
        R::KIND
    }

    fn phase(&self) -> Phase {
        Engine::phase(self)
    }

    fn start(&mut self, sched: &mut dyn Scheduler) {
        Engine::start(self, sched);
    }

    fn submit_input(&mut self, sched: &mut dyn Scheduler, player: Player, input: Input) -> Verdict {
        Engine::submit_input(self, sched, player, input)
    }

    fn tick(&mut self, sched: &mut dyn Scheduler) {
        Engine::tick(self, sched);
    }

    fn fire(&mut self, sched: &mut dyn Scheduler, id: TimerId) -> bool {
        Engine::fire(self, sched, id)
    }

    fn dispose(&mut self, sched: &mut dyn Scheduler) {
        Engine::dispose(self, sched);
    }

    fn is_disposed(&self) -> bool {
        Engine::is_disposed(self)
    }

    fn snapshot(&self, now: Millis) -> Snapshot {
        Engine::snapshot(self, now)
    }
}
