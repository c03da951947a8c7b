//! Pattern Memory.
//!
//! A random sequence of boxes flashes one at a time. Then both players
//! repeat it on their own row of buttons. A wrong press knocks a player
//! out. If the opponent is knocked out, the other player wins. If both
//! players complete the sequence, the round is a draw.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{MatchConfig, Player, PlayerMap, Validate};
use crate::engine::{Input, Outcome, RoundCtx, RoundResult, Rules, Verdict};
use crate::games::{GameKind, Payload};
use crate::timing::Millis;

/// Box indices; patterns are short.
pub type Pattern = SmallVec<[u8; 8]>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    pub pattern_length: usize,
    pub box_count: u8,
    /// Dark pause before each flash.
    pub show_delay_ms: Millis,
    /// How long each box stays lit.
    pub show_duration_ms: Millis,
    /// Pause after the last flash before the buttons open.
    pub input_lead_ms: Millis,
    /// Limit on the input phase; unfinished players fail when it runs out.
    /// `None` leaves the buttons open until both players are done.
    pub input_window_ms: Option<Millis>,
    pub flow: MatchConfig,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            pattern_length: 4,
            box_count: 4,
            show_delay_ms: 600,
            show_duration_ms: 400,
            input_lead_ms: 300,
            input_window_ms: Some(10_000),
            flow: MatchConfig::default().with_resolve_display(1200).with_tap_effect(200),
        }
    }
}

impl MemorySettings {
    #[must_use]
    pub fn with_pattern(mut self, length: usize, box_count: u8) -> Self {
        self.pattern_length = length;
        self.box_count = box_count;
        self
    }

    #[must_use]
    pub fn with_show_timing(mut self, delay_ms: Millis, duration_ms: Millis, lead_ms: Millis) -> Self {
        self.show_delay_ms = delay_ms;
        self.show_duration_ms = duration_ms;
        self.input_lead_ms = lead_ms;
        self
    }

    #[must_use]
    pub fn with_input_window(mut self, ms: Millis) -> Self {
        self.input_window_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn without_input_window(mut self) -> Self {
        self.input_window_ms = None;
        self
    }

    #[must_use]
    pub fn with_flow(mut self, flow: MatchConfig) -> Self {
        self.flow = flow;
        self
    }

    /// Time from round start until the buttons open.
    #[must_use]
    pub fn reveal_ms(&self) -> Millis {
        let step = self.show_delay_ms.saturating_add(self.show_duration_ms);
        (self.pattern_length as Millis)
            .saturating_mul(step)
            .saturating_add(self.input_lead_ms)
    }
}

impl Validate for MemorySettings {
    fn validate(&self) -> Result<()> {
        ensure!(self.pattern_length > 0, "pattern length must be positive");
        ensure!(self.box_count > 0, "pattern memory needs at least one box");
        ensure!(self.input_window_ms != Some(0), "input window must be positive when set");
        self.flow.validate()
    }
}

/// Where a player stands in reproducing the pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Entering,
    Passed,
    Failed,
}

/// One player's input buffer for the round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    entered: Pattern,
    status: Status,
}

impl Progress {
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn entered(&self) -> &[u8] {
        &self.entered
    }

    /// Record one press and judge it against `pattern`.
    ///
    /// ```
    /// use party_duel::engine::Verdict;
    /// use party_duel::games::memory::{Progress, Status};
    ///
    /// let pattern = [2, 0, 3, 1];
    /// let mut progress = Progress::default();
    /// for step in [2, 0, 3, 1] {
    ///     assert_eq!(progress.push(&pattern, step), Verdict::Correct);
    /// }
    /// assert_eq!(progress.status(), Status::Passed);
    /// ```
    pub fn push(&mut self, pattern: &[u8], step: u8) -> Verdict {
        if self.status != Status::Entering {
            return Verdict::Ignored;
        }
        let index = self.entered.len();
        self.entered.push(step);

        if pattern.get(index) != Some(&step) {
            self.status = Status::Failed;
            return Verdict::Wrong;
        }
        if self.entered.len() == pattern.len() {
            self.status = Status::Passed;
        }
        Verdict::Correct
    }

    fn give_up(&mut self) {
        if self.status == Status::Entering {
            self.status = Status::Failed;
        }
    }
}

/// Decide the round from both players' status, or `None` while it is
/// still open.
#[must_use]
pub fn judge(p1: Status, p2: Status) -> Option<Outcome> {
    use Status::*;
    match (p1, p2) {
        (Passed, Passed) => Some(Outcome::Draw),
        (Failed, Failed) => Some(Outcome::NoContest),
        (Passed, Failed) | (Entering, Failed) => Some(Outcome::Win { winner: Player::P1 }),
        (Failed, Passed) | (Failed, Entering) => Some(Outcome::Win { winner: Player::P2 }),
        (Entering, _) | (_, Entering) => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryTimer {
    /// Light up pattern step `n`.
    Flash(usize),
    /// Turn pattern step `n` off.
    Dim(usize),
    /// Open the buttons.
    Open,
    /// The input window ran out.
    Deadline,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryView {
    pub pattern_length: usize,
    pub box_count: u8,
    /// Box currently lit during the reveal.
    pub lit: Option<u8>,
    /// Presses entered so far.
    pub entered: PlayerMap<usize>,
    pub status: PlayerMap<Status>,
    /// The full pattern, once the round is decided.
    pub solution: Option<Vec<u8>>,
}

pub struct MemoryRules {
    settings: MemorySettings,
    pattern: Pattern,
    lit: Option<u8>,
    progress: PlayerMap<Progress>,
    decided: bool,
}

impl MemoryRules {
    #[must_use]
    pub fn new(settings: MemorySettings) -> Self {
        Self {
            settings,
            pattern: Pattern::new(),
            lit: None,
            progress: PlayerMap::with_default(),
            decided: false,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &MemorySettings {
        &self.settings
    }

    /// The pattern for the current round.
    #[must_use]
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    #[must_use]
    pub fn progress(&self, player: Player) -> &Progress {
        &self.progress[player]
    }

    fn settle(&mut self, ctx: &mut RoundCtx<'_, MemoryTimer>) {
        let Some(outcome) = judge(self.progress[Player::P1].status, self.progress[Player::P2].status) else {
            return;
        };
        self.decided = true;
        ctx.resolve(RoundResult::point_to_winner(outcome));
    }
}

impl Validate for MemoryRules {
    fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}

impl Rules for MemoryRules {
    type Timer = MemoryTimer;

    const KIND: GameKind = GameKind::Memory;

    fn flow(&self) -> &MatchConfig {
        &self.settings.flow
    }

    fn recognizes(&self, input: Input) -> bool {
        matches!(input, Input::Press(_))
    }

    fn begin_round(&mut self, ctx: &mut RoundCtx<'_, MemoryTimer>) {
        let boxes = usize::from(self.settings.box_count);
        self.pattern = (0..self.settings.pattern_length)
            .map(|_| ctx.rng().gen_range_usize(0..boxes) as u8)
            .collect();
        self.lit = None;
        self.progress = PlayerMap::with_default();
        self.decided = false;
        log::debug!("memory: pattern of {} drawn", self.pattern.len());

        ctx.after(self.settings.show_delay_ms, MemoryTimer::Flash(0));
    }

    fn on_timer(&mut self, timer: MemoryTimer, ctx: &mut RoundCtx<'_, MemoryTimer>) {
        match timer {
            MemoryTimer::Flash(step) => {
                self.lit = self.pattern.get(step).copied();
                ctx.after(self.settings.show_duration_ms, MemoryTimer::Dim(step));
            }
            MemoryTimer::Dim(step) => {
                self.lit = None;
                if step + 1 < self.pattern.len() {
                    ctx.after(self.settings.show_delay_ms, MemoryTimer::Flash(step + 1));
                } else {
                    ctx.after(self.settings.input_lead_ms, MemoryTimer::Open);
                }
            }
            MemoryTimer::Open => {
                ctx.activate();
                if let Some(window) = self.settings.input_window_ms {
                    ctx.after(window, MemoryTimer::Deadline);
                }
            }
            MemoryTimer::Deadline => {
                log::debug!("memory: input window closed");
                for (_, progress) in self.progress.iter_mut() {
                    progress.give_up();
                }
                self.settle(ctx);
            }
        }
    }

    fn on_input(&mut self, player: Player, input: Input, ctx: &mut RoundCtx<'_, MemoryTimer>) -> Verdict {
        let Input::Press(step) = input else {
            return Verdict::Ignored;
        };
        if step >= self.settings.box_count {
            return Verdict::Ignored;
        }

        let verdict = self.progress[player].push(&self.pattern, step);
        if self.progress[player].status != Status::Entering {
            ctx.lock(player);
        }
        self.settle(ctx);
        verdict
    }

    fn match_over(&self, _scores: &PlayerMap<i64>, _round: u32) -> bool {
        true
    }

    fn match_outcome(&self, _scores: &PlayerMap<i64>, last: &RoundResult) -> Outcome {
        last.outcome
    }

    fn payload(&self, _now: Millis) -> Payload {
        Payload::Memory(MemoryView {
            pattern_length: self.pattern.len(),
            box_count: self.settings.box_count,
            lit: self.lit,
            entered: PlayerMap::new(|p| self.progress[p].entered.len()),
            status: PlayerMap::new(|p| self.progress[p].status),
            solution: self.decided.then(|| self.pattern.to_vec()),
        })
    }
}
