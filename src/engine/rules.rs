//! The policy trait each game implements, and the context it works in.
//!
//! The engine owns the phase graph, scores, locks, timers and reporting.
//! A `Rules` implementation only supplies the payload: how a round is set
//! up, what each timer means, how an input is judged and when the match
//! is over.

use rustc_hash::FxHashMap;

use super::outcome::{Outcome, RoundResult};
use super::{Input, Verdict};
use crate::core::{GameRng, MatchConfig, Phase, Player, PlayerMap, Validate};
use crate::games::{GameKind, Payload};
use crate::timing::{Millis, Scheduler, TimerId};

/// Game-specific policy plugged into [`Engine`](super::Engine).
///
/// ## Implementation Notes
///
/// - `begin_round`: runs in `Setup`. Either schedule the go-signal or call
///   `ctx.activate()` right away.
/// - `on_input`: runs only in `Active`, only for recognized inputs, and
///   only for players not yet locked.
/// - Call `ctx.resolve(..)` to finish the round. The engine cancels the
///   round's remaining timers.
pub trait Rules: Validate {
    /// Payload of the timers this game schedules.
    type Timer: Copy + std::fmt::Debug;

    const KIND: GameKind;

    /// Match-flow options for this game.
    fn flow(&self) -> &MatchConfig;

    /// Whether `input` means anything in this game.
    fn recognizes(&self, input: Input) -> bool;

    /// Whether input during `Setup` is a foul.
    fn fouls_in_setup(&self) -> bool {
        false
    }

    /// Result of a foul by `offender`. The opponent takes the round.
    fn foul_result(&self, offender: Player) -> RoundResult {
        RoundResult::point_to_winner(Outcome::Foul { offender })
    }

    /// Draw a fresh payload for the round and schedule the go-signal.
    fn begin_round(&mut self, ctx: &mut RoundCtx<'_, Self::Timer>);

    /// A timer registered through `ctx.after` came due.
    fn on_timer(&mut self, timer: Self::Timer, ctx: &mut RoundCtx<'_, Self::Timer>);

    /// Judge a gameplay input.
    fn on_input(&mut self, player: Player, input: Input, ctx: &mut RoundCtx<'_, Self::Timer>) -> Verdict;

    /// Advance time-based payloads. Returns true if anything moved.
    fn on_tick(&mut self, _ctx: &mut RoundCtx<'_, Self::Timer>) -> bool {
        false
    }

    /// Whether the match is over after `round` rounds with these scores.
    fn match_over(&self, scores: &PlayerMap<i64>, round: u32) -> bool;

    /// Match outcome. Defaults to the higher score winning.
    fn match_outcome(&self, scores: &PlayerMap<i64>, _last: &RoundResult) -> Outcome {
        Outcome::from_leader(scores.leader())
    }

    /// Variant payload for snapshots.
    fn payload(&self, now: Millis) -> Payload;
}

/// A timer the engine is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pending<T> {
    /// Registered by the rules for the current round.
    Rules(T),
    /// The `Resolved` display has run its course.
    AfterResolve,
}

/// Mutable round state owned by the engine.
#[derive(Debug)]
pub(crate) struct RoundState<T> {
    pub phase: Phase,
    pub round: u32,
    pub scores: PlayerMap<i64>,
    pub locked: PlayerMap<bool>,
    pub timers: FxHashMap<TimerId, Pending<T>>,
    pub resolution: Option<RoundResult>,
    pub activated_at: Option<Millis>,
}

impl<T> Default for RoundState<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            round: 0,
            scores: PlayerMap::with_default(),
            locked: PlayerMap::with_default(),
            timers: FxHashMap::default(),
            resolution: None,
            activated_at: None,
        }
    }
}

impl<T> RoundState<T> {
    /// Cancel every timer still registered with the scheduler.
    pub fn cancel_timers(&mut self, sched: &mut dyn Scheduler) {
        for (id, _) in self.timers.drain() {
            sched.cancel(id);
        }
    }
}

/// What a `Rules` implementation may do while handling an event.
pub struct RoundCtx<'a, T> {
    sched: &'a mut dyn Scheduler,
    rng: &'a mut GameRng,
    state: &'a mut RoundState<T>,
}

impl<'a, T> RoundCtx<'a, T> {
    pub(crate) fn new(sched: &'a mut dyn Scheduler, rng: &'a mut GameRng, state: &'a mut RoundState<T>) -> Self {
        Self { sched, rng, state }
    }

    #[must_use]
    pub fn now(&self) -> Millis {
        self.sched.now()
    }

    pub fn rng(&mut self) -> &mut GameRng {
        &mut *self.rng
    }

    /// Current round number (starts at 1).
    #[must_use]
    pub fn round(&self) -> u32 {
        self.state.round
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub fn scores(&self) -> &PlayerMap<i64> {
        &self.state.scores
    }

    /// When the go-signal was given this round.
    #[must_use]
    pub fn activated_at(&self) -> Option<Millis> {
        self.state.activated_at
    }

    /// Schedule `timer` to come back through `on_timer` after `delay_ms`.
    pub fn after(&mut self, delay_ms: Millis, timer: T) -> TimerId {
        let id = self.sched.after(delay_ms);
        self.state.timers.insert(id, Pending::Rules(timer));
        id
    }

    /// Cancel one of this round's timers.
    pub fn cancel(&mut self, id: TimerId) {
        if self.state.timers.remove(&id).is_some() {
            self.sched.cancel(id);
        }
    }

    /// Give the go-signal: `Setup` becomes `Active`.
    pub fn activate(&mut self) {
        if self.state.phase != Phase::Setup {
            log::trace!("activate ignored in {}", self.state.phase);
            return;
        }
        self.state.phase = Phase::Active;
        self.state.activated_at = Some(self.sched.now());
        log::debug!("round {} active at {}ms", self.state.round, self.sched.now());
    }

    /// Lock in `player`'s action; further input from them is ignored
    /// until the next round.
    pub fn lock(&mut self, player: Player) {
        self.state.locked[player] = true;
    }

    #[must_use]
    pub fn is_locked(&self, player: Player) -> bool {
        self.state.locked[player]
    }

    /// Finish the round. Only the first resolution in a round counts.
    pub fn resolve(&mut self, result: RoundResult) {
        if self.state.resolution.is_none() {
            self.state.resolution = Some(result);
        }
    }
}
