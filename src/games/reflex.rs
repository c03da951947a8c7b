//! Reflex Battle.
//!
//! Both areas show WAIT for a random 2-6 seconds, then switch to TAP.
//! The first tap after the switch wins; a tap before it is a foul and
//! hands the round to the opponent.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::core::{MatchConfig, Player, PlayerMap, Validate};
use crate::engine::{Input, Outcome, RoundCtx, RoundResult, Rules, Verdict};
use crate::games::{GameKind, Payload};
use crate::timing::Millis;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflexSettings {
    /// Shortest wait before the go-signal (inclusive).
    pub delay_min_ms: Millis,
    /// Longest wait before the go-signal (inclusive).
    pub delay_max_ms: Millis,
    /// Round wins needed to take the match.
    pub target_wins: u32,
    pub flow: MatchConfig,
}

impl Default for ReflexSettings {
    fn default() -> Self {
        Self {
            delay_min_ms: 2000,
            delay_max_ms: 6000,
            target_wins: 1,
            flow: MatchConfig::default(),
        }
    }
}

impl ReflexSettings {
    #[must_use]
    pub fn with_delay(mut self, min_ms: Millis, max_ms: Millis) -> Self {
        self.delay_min_ms = min_ms;
        self.delay_max_ms = max_ms;
        self
    }

    #[must_use]
    pub fn with_target_wins(mut self, wins: u32) -> Self {
        self.target_wins = wins;
        self
    }

    #[must_use]
    pub fn with_flow(mut self, flow: MatchConfig) -> Self {
        self.flow = flow;
        self
    }
}

impl Validate for ReflexSettings {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.delay_min_ms <= self.delay_max_ms,
            "reflex delay bounds inverted: {}ms > {}ms",
            self.delay_min_ms,
            self.delay_max_ms
        );
        ensure!(self.target_wins > 0, "reflex needs at least one win to finish");
        self.flow.validate()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReflexTimer {
    Go,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflexView {
    /// When the go-signal was shown, if it has been.
    pub go_at: Option<Millis>,
}

pub struct ReflexRules {
    settings: ReflexSettings,
    go_at: Option<Millis>,
    /// Wait drawn for the current round.
    delay_ms: Millis,
}

impl ReflexRules {
    #[must_use]
    pub fn new(settings: ReflexSettings) -> Self {
        Self {
            settings,
            go_at: None,
            delay_ms: 0,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ReflexSettings {
        &self.settings
    }

    /// Wait drawn for the current round.
    #[must_use]
    pub fn delay_ms(&self) -> Millis {
        self.delay_ms
    }
}

impl Validate for ReflexRules {
    fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}

impl Rules for ReflexRules {
    type Timer = ReflexTimer;

    const KIND: GameKind = GameKind::Reflex;

    fn flow(&self) -> &MatchConfig {
        &self.settings.flow
    }

    fn recognizes(&self, input: Input) -> bool {
        input == Input::Tap
    }

    fn fouls_in_setup(&self) -> bool {
        true
    }

    fn begin_round(&mut self, ctx: &mut RoundCtx<'_, ReflexTimer>) {
        self.go_at = None;
        self.delay_ms = ctx.rng().random_delay(self.settings.delay_min_ms, self.settings.delay_max_ms);
        ctx.after(self.delay_ms, ReflexTimer::Go);
    }

    fn on_timer(&mut self, timer: ReflexTimer, ctx: &mut RoundCtx<'_, ReflexTimer>) {
        match timer {
            ReflexTimer::Go => {
                self.go_at = Some(ctx.now());
                ctx.activate();
            }
        }
    }

    fn on_input(&mut self, player: Player, _input: Input, ctx: &mut RoundCtx<'_, ReflexTimer>) -> Verdict {
        ctx.lock(player);
        let mut result = RoundResult::point_to_winner(Outcome::Win { winner: player });
        if let Some(go_at) = self.go_at {
            result = result.with_reaction(ctx.now().saturating_sub(go_at));
        }
        ctx.resolve(result);
        Verdict::Correct
    }

    fn match_over(&self, scores: &PlayerMap<i64>, _round: u32) -> bool {
        let target = i64::from(self.settings.target_wins);
        Player::all().any(|p| scores[p] >= target)
    }

    fn payload(&self, _now: Millis) -> Payload {
        Payload::Reflex(ReflexView { go_at: self.go_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ReflexSettings::default();
        assert_eq!(settings.delay_min_ms, 2000);
        assert_eq!(settings.delay_max_ms, 6000);
        assert_eq!(settings.target_wins, 1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_inverted_delay_rejected() {
        let settings = ReflexSettings::default().with_delay(5000, 1000);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("inverted"));
    }

    #[test]
    fn test_zero_target_rejected() {
        assert!(ReflexSettings::default().with_target_wins(0).validate().is_err());
    }

    #[test]
    fn test_match_over_at_target() {
        let rules = ReflexRules::new(ReflexSettings::default().with_target_wins(2));
        let mut scores = PlayerMap::with_value(0);
        scores[Player::P2] = 1;
        assert!(!rules.match_over(&scores, 1));
        scores[Player::P2] = 2;
        assert!(rules.match_over(&scores, 2));
    }

    #[test]
    fn test_settings_serialization() {
        let settings = ReflexSettings::default().with_delay(100, 200);
        let json = serde_json::to_string(&settings).unwrap();
        let back: ReflexSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }
}
