//! The generic round engine.

use anyhow::Result;

use super::host::{InputMark, Presenter, Reporter, Snapshot};
use super::outcome::{MatchResult, Outcome, Report, RoundResult};
use super::rules::{Pending, RoundCtx, RoundState, Rules};
use super::{Input, Verdict};
use crate::core::{GameRng, MatchConfig, Phase, Player, PlayerMap, Validate};
use crate::timing::{Millis, Scheduler, TimerId};

/// One running game: the shared phase machine driving a `Rules` policy.
///
/// Every operation takes the scheduler explicitly; the engine records
/// which timers it registered and ignores any other id it is handed.
/// Invalid operations are no-ops, so a mistimed tap never breaks a game.
///
/// ## Example
///
/// ```
/// use party_duel::core::{Phase, Player};
/// use party_duel::engine::{Engine, Input, Verdict};
/// use party_duel::games::reflex::{ReflexRules, ReflexSettings};
/// use party_duel::timing::Timeline;
///
/// let mut timeline = Timeline::new();
/// let mut game = Engine::new(ReflexRules::new(ReflexSettings::default())).unwrap();
///
/// game.start(&mut timeline);
/// assert_eq!(game.phase(), Phase::Setup);
///
/// // Tapping before the go-signal is a foul.
/// assert_eq!(game.submit_input(&mut timeline, Player::P1, Input::Tap), Verdict::Foul);
/// assert_eq!(game.phase(), Phase::Resolved);
/// ```
pub struct Engine<R: Rules> {
    rules: R,
    config: MatchConfig,
    rng: GameRng,
    state: RoundState<R::Timer>,
    match_live: bool,
    disposed: bool,
    last_input: Option<InputMark>,
    last_round: Option<RoundResult>,
    last_match: Option<MatchResult>,
    reporter: Option<Box<dyn Reporter>>,
    presenter: Option<Box<dyn Presenter>>,
}

impl<R: Rules> Engine<R> {
    /// Build an engine around validated rules.
    pub fn new(rules: R) -> Result<Self> {
        rules.validate()?;
        let config = rules.flow().clone();
        config.validate()?;

        Ok(Self {
            rng: GameRng::new(config.seed),
            rules,
            config,
            state: RoundState::default(),
            match_live: false,
            disposed: false,
            last_input: None,
            last_round: None,
            last_match: None,
            reporter: None,
            presenter: None,
        })
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    #[must_use]
    pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.state.round
    }

    #[must_use]
    pub fn scores(&self) -> &PlayerMap<i64> {
        &self.state.scores
    }

    #[must_use]
    pub fn is_locked(&self, player: Player) -> bool {
        self.state.locked[player]
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Timers this engine is still waiting on.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.state.timers.len()
    }

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn last_round(&self) -> Option<&RoundResult> {
        self.last_round.as_ref()
    }

    #[must_use]
    pub fn last_match(&self) -> Option<&MatchResult> {
        self.last_match.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self, now: Millis) -> Snapshot {
        Snapshot {
            kind: R::KIND,
            phase: self.state.phase,
            round: self.state.round,
            scores: self.state.scores,
            locked: self.state.locked,
            last_input: self.last_input,
            tap_effect_ms: self.config.tap_effect_ms,
            now,
            payload: self.rules.payload(now),
        }
    }

    // === Operations ===

    /// Start a match (from `Ended`, or before the first match) or the next
    /// round of the current match (from `Idle`). Ignored anywhere else.
    pub fn start(&mut self, sched: &mut dyn Scheduler) {
        if self.disposed {
            return;
        }
        if !self.state.phase.accepts_start() {
            log::trace!("{}: start ignored in {}", R::KIND, self.state.phase);
            return;
        }

        if self.state.phase == Phase::Ended || !self.match_live {
            self.state.scores.clear();
            self.state.round = 0;
            self.match_live = true;
            self.last_round = None;
            self.last_match = None;
            log::info!("{}: match started at {}ms", R::KIND, sched.now());
        }

        self.begin_round(sched);
        self.render(sched.now());
    }

    /// Hand a player's input to the game and return its verdict.
    ///
    /// Input outside `Active` is ignored, except during `Setup` in games
    /// that punish early input, where it is a foul. Input from a player
    /// already locked in this round is ignored.
    pub fn submit_input(&mut self, sched: &mut dyn Scheduler, player: Player, input: Input) -> Verdict {
        if self.disposed || !self.rules.recognizes(input) {
            return Verdict::Ignored;
        }
        if self.state.locked[player] {
            log::trace!("{}: {} already locked, {:?} ignored", R::KIND, player, input);
            return Verdict::Ignored;
        }

        let verdict = match self.state.phase {
            Phase::Setup if self.rules.fouls_in_setup() => {
                log::debug!("{}: {} fouled with {:?}", R::KIND, player, input);
                self.state.locked[player] = true;
                let result = self.rules.foul_result(player);
                self.state.resolution = Some(result);
                Verdict::Foul
            }
            Phase::Active => self.drive(sched, |rules, ctx| rules.on_input(player, input, ctx)),
            phase => {
                log::trace!("{}: {:?} from {} ignored in {}", R::KIND, input, player, phase);
                Verdict::Ignored
            }
        };

        if verdict.is_ignored() {
            return verdict;
        }

        self.last_input = Some(InputMark { player, input, at: sched.now() });
        self.settle(sched);
        self.render(sched.now());
        verdict
    }

    /// Advance time-based payloads to the scheduler's current time.
    pub fn tick(&mut self, sched: &mut dyn Scheduler) {
        if self.disposed || self.state.phase != Phase::Active {
            return;
        }
        let moved = self.drive(sched, |rules, ctx| rules.on_tick(ctx));
        self.settle(sched);
        if moved {
            self.render(sched.now());
        }
    }

    /// Deliver an expired timer. Returns false if the id is not one this
    /// engine is waiting on.
    pub fn fire(&mut self, sched: &mut dyn Scheduler, id: TimerId) -> bool {
        if self.disposed {
            return false;
        }
        let Some(pending) = self.state.timers.remove(&id) else {
            log::trace!("{}: stray {} ignored", R::KIND, id);
            return false;
        };

        match pending {
            Pending::Rules(timer) => {
                self.drive(sched, |rules, ctx| rules.on_timer(timer, ctx));
                self.settle(sched);
            }
            Pending::AfterResolve => self.after_resolve(sched),
        }
        self.render(sched.now());
        true
    }

    /// Cancel every pending timer and go inert. Safe to call repeatedly.
    pub fn dispose(&mut self, sched: &mut dyn Scheduler) {
        if self.disposed {
            return;
        }
        self.state.cancel_timers(sched);
        self.disposed = true;
        self.reporter = None;
        self.presenter = None;
        log::info!("{}: disposed in {}", R::KIND, self.state.phase);
    }

    // === Transitions ===

    fn drive<O>(&mut self, sched: &mut dyn Scheduler, f: impl FnOnce(&mut R, &mut RoundCtx<'_, R::Timer>) -> O) -> O {
        let mut ctx = RoundCtx::new(sched, &mut self.rng, &mut self.state);
        f(&mut self.rules, &mut ctx)
    }

    fn transition(&mut self, next: Phase) {
        debug_assert!(
            self.state.phase.can_advance_to(next),
            "illegal transition {} -> {}",
            self.state.phase,
            next
        );
        log::debug!("{}: {} -> {}", R::KIND, self.state.phase, next);
        self.state.phase = next;
    }

    fn begin_round(&mut self, sched: &mut dyn Scheduler) {
        self.state.round += 1;
        self.state.locked.clear();
        self.state.activated_at = None;
        self.state.resolution = None;
        self.transition(Phase::Setup);
        self.drive(sched, |rules, ctx| rules.begin_round(ctx));
        self.settle(sched);
    }

    /// Apply a resolution the rules (or a foul) requested.
    fn settle(&mut self, sched: &mut dyn Scheduler) {
        let Some(mut result) = self.state.resolution.take() else {
            return;
        };
        if !self.state.phase.in_round() {
            return;
        }

        self.state.cancel_timers(sched);
        result.round = self.state.round;
        for (player, delta) in result.score_delta.iter() {
            self.state.scores[player] += *delta;
        }
        self.transition(Phase::Resolved);
        log::debug!(
            "{}: round {} {:?}, scores {:?}",
            R::KIND,
            result.round,
            result.outcome,
            self.state.scores
        );

        self.report(Report::Round(result.clone()));
        self.last_round = Some(result);

        let id = sched.after(self.config.resolve_display_ms);
        self.state.timers.insert(id, Pending::AfterResolve);
    }

    fn after_resolve(&mut self, sched: &mut dyn Scheduler) {
        if self.rules.match_over(&self.state.scores, self.state.round) {
            self.transition(Phase::Ended);
            self.match_live = false;

            let outcome = match &self.last_round {
                Some(last) => self.rules.match_outcome(&self.state.scores, last),
                None => Outcome::from_leader(self.state.scores.leader()),
            };
            let result = MatchResult {
                outcome,
                scores: self.state.scores,
                rounds: self.state.round,
            };
            log::info!("{}: match over after {} rounds, {:?}", R::KIND, result.rounds, outcome);
            self.report(Report::Match(result.clone()));
            self.last_match = Some(result);
        } else {
            self.transition(Phase::Idle);
            if self.config.auto_advance {
                self.begin_round(sched);
            }
        }
    }

    fn report(&mut self, report: Report) {
        if let Some(reporter) = self.reporter.as_mut() {
            reporter.on_result(&report);
        }
    }

    fn render(&mut self, now: Millis) {
        if self.presenter.is_none() {
            return;
        }
        let snapshot = self.snapshot(now);
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.render(&snapshot);
        }
    }
}
