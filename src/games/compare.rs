//! Number Duel.
//!
//! Two different numbers are dealt; a moment later the goal is revealed
//! (BIGGER WINS or SMALLER WINS). The first player to pick decides the
//! round: a correct pick scores for them, a wrong one for the opponent.
//! First to three takes the match.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::core::{GameRng, MatchConfig, Player, PlayerMap, Validate};
use crate::engine::{Input, Outcome, RoundCtx, RoundResult, Rules, Side, Verdict};
use crate::games::{GameKind, Payload};
use crate::timing::Millis;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareSettings {
    /// Smallest number that can be dealt (inclusive).
    pub min: i32,
    /// Largest number that can be dealt (inclusive).
    pub max: i32,
    /// Round wins needed to take the match.
    pub max_score: u32,
    /// Rule announcement shown before the first round of a match.
    pub intro_ms: Millis,
    /// Pause between the announcement and the first deal.
    pub intro_gap_ms: Millis,
    /// Time between dealing the numbers and revealing the goal.
    pub goal_delay_ms: Millis,
    pub flow: MatchConfig,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            min: 1,
            max: 99,
            max_score: 3,
            intro_ms: 1500,
            intro_gap_ms: 300,
            goal_delay_ms: 600,
            flow: MatchConfig::default().with_resolve_display(1500).with_tap_effect(120),
        }
    }
}

impl CompareSettings {
    #[must_use]
    pub fn with_range(mut self, min: i32, max: i32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn with_max_score(mut self, max_score: u32) -> Self {
        self.max_score = max_score;
        self
    }

    #[must_use]
    pub fn with_intro(mut self, intro_ms: Millis, intro_gap_ms: Millis) -> Self {
        self.intro_ms = intro_ms;
        self.intro_gap_ms = intro_gap_ms;
        self
    }

    #[must_use]
    pub fn with_goal_delay(mut self, ms: Millis) -> Self {
        self.goal_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn with_flow(mut self, flow: MatchConfig) -> Self {
        self.flow = flow;
        self
    }
}

impl Validate for CompareSettings {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.min < self.max,
            "number range {}..={} cannot yield two different numbers",
            self.min,
            self.max
        );
        ensure!(self.max_score > 0, "number duel needs a positive max score");
        self.flow.validate()
    }
}

/// Which value the revealed goal favours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    Bigger,
    Smaller,
}

/// The two numbers dealt for a round. Always distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberPair {
    pub a: i32,
    pub b: i32,
}

impl NumberPair {
    /// Deal two numbers from `[min, max]`, redrawing until they differ.
    ///
    /// Requires `min < max`.
    pub fn deal(rng: &mut GameRng, min: i32, max: i32) -> Self {
        loop {
            let a = rng.gen_inclusive(min, max);
            let b = rng.gen_inclusive(min, max);
            if a != b {
                return Self { a, b };
            }
        }
    }

    #[must_use]
    pub fn value(&self, side: Side) -> i32 {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    /// The side that satisfies `goal`.
    ///
    /// ```
    /// use party_duel::engine::Side;
    /// use party_duel::games::compare::{Goal, NumberPair};
    ///
    /// let pair = NumberPair { a: 37, b: 82 };
    /// assert_eq!(pair.winning_side(Goal::Bigger), Side::B);
    /// assert_eq!(pair.winning_side(Goal::Smaller), Side::A);
    /// ```
    #[must_use]
    pub fn winning_side(&self, goal: Goal) -> Side {
        let a_bigger = self.a > self.b;
        match (goal, a_bigger) {
            (Goal::Bigger, true) | (Goal::Smaller, false) => Side::A,
            _ => Side::B,
        }
    }

    #[must_use]
    pub fn is_correct(&self, side: Side, goal: Goal) -> bool {
        self.winning_side(goal) == side
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareTimer {
    /// The rule announcement is over; deal the first pair.
    Deal,
    /// Reveal the goal and open the buttons.
    Reveal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareView {
    /// The rule announcement is showing.
    pub announcing: bool,
    pub numbers: Option<NumberPair>,
    pub goal: Option<Goal>,
}

pub struct CompareRules {
    settings: CompareSettings,
    announcing: bool,
    numbers: Option<NumberPair>,
    goal: Option<Goal>,
}

impl CompareRules {
    #[must_use]
    pub fn new(settings: CompareSettings) -> Self {
        Self {
            settings,
            announcing: false,
            numbers: None,
            goal: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &CompareSettings {
        &self.settings
    }

    #[must_use]
    pub fn numbers(&self) -> Option<NumberPair> {
        self.numbers
    }

    #[must_use]
    pub fn goal(&self) -> Option<Goal> {
        self.goal
    }

    fn deal(&mut self, ctx: &mut RoundCtx<'_, CompareTimer>) {
        self.announcing = false;
        self.numbers = Some(NumberPair::deal(ctx.rng(), self.settings.min, self.settings.max));
        ctx.after(self.settings.goal_delay_ms, CompareTimer::Reveal);
    }
}

impl Validate for CompareRules {
    fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}

impl Rules for CompareRules {
    type Timer = CompareTimer;

    const KIND: GameKind = GameKind::Compare;

    fn flow(&self) -> &MatchConfig {
        &self.settings.flow
    }

    fn recognizes(&self, input: Input) -> bool {
        matches!(input, Input::Pick(_))
    }

    fn begin_round(&mut self, ctx: &mut RoundCtx<'_, CompareTimer>) {
        self.numbers = None;
        self.goal = None;

        let intro = self.settings.intro_ms.saturating_add(self.settings.intro_gap_ms);
        if ctx.round() == 1 && intro > 0 {
            self.announcing = true;
            ctx.after(intro, CompareTimer::Deal);
        } else {
            self.deal(ctx);
        }
    }

    fn on_timer(&mut self, timer: CompareTimer, ctx: &mut RoundCtx<'_, CompareTimer>) {
        match timer {
            CompareTimer::Deal => self.deal(ctx),
            CompareTimer::Reveal => {
                let goal = if ctx.rng().gen_bool(0.5) { Goal::Bigger } else { Goal::Smaller };
                log::debug!("compare: {:?} revealed for {:?}", goal, self.numbers);
                self.goal = Some(goal);
                ctx.activate();
            }
        }
    }

    fn on_input(&mut self, player: Player, input: Input, ctx: &mut RoundCtx<'_, CompareTimer>) -> Verdict {
        let (Input::Pick(side), Some(numbers), Some(goal)) = (input, self.numbers, self.goal) else {
            return Verdict::Ignored;
        };

        ctx.lock(player);
        let correct = numbers.is_correct(side, goal);
        let winner = if correct { player } else { player.opponent() };
        let mut result = RoundResult::point_to_winner(Outcome::Win { winner });
        if let Some(at) = ctx.activated_at() {
            result = result.with_reaction(ctx.now().saturating_sub(at));
        }
        ctx.resolve(result);

        if correct {
            Verdict::Correct
        } else {
            Verdict::Wrong
        }
    }

    fn match_over(&self, scores: &PlayerMap<i64>, _round: u32) -> bool {
        let target = i64::from(self.settings.max_score);
        Player::all().any(|p| scores[p] >= target)
    }

    fn payload(&self, _now: Millis) -> Payload {
        Payload::Compare(CompareView {
            announcing: self.announcing,
            numbers: self.numbers,
            goal: self.goal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bigger_wins_judgement() {
        let pair = NumberPair { a: 37, b: 82 };
        assert!(pair.is_correct(Side::B, Goal::Bigger));
        assert!(!pair.is_correct(Side::A, Goal::Bigger));
        assert_eq!(pair.value(pair.winning_side(Goal::Bigger)), 82);
    }

    #[test]
    fn test_smaller_wins_judgement() {
        let pair = NumberPair { a: 37, b: 82 };
        assert!(pair.is_correct(Side::A, Goal::Smaller));
        assert!(!pair.is_correct(Side::B, Goal::Smaller));
    }

    #[test]
    fn test_deal_never_collides_on_tight_range() {
        let mut rng = GameRng::new(5);
        for _ in 0..500 {
            let pair = NumberPair::deal(&mut rng, 1, 2);
            assert_ne!(pair.a, pair.b);
        }
    }

    #[test]
    fn test_single_value_range_rejected() {
        let settings = CompareSettings::default().with_range(4, 4);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_default_settings() {
        let settings = CompareSettings::default();
        assert_eq!((settings.min, settings.max), (1, 99));
        assert_eq!(settings.max_score, 3);
        assert_eq!(settings.flow.resolve_display_ms, 1500);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_match_over_first_to_max_score() {
        let rules = CompareRules::new(CompareSettings::default());
        let mut scores = PlayerMap::with_value(2);
        assert!(!rules.match_over(&scores, 4));
        scores[Player::P1] = 3;
        assert!(rules.match_over(&scores, 5));
    }
}
