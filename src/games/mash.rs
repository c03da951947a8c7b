//! Tap Rush.
//!
//! A 3-2-1 countdown, then five seconds of tapping. The player with the
//! strictly higher count wins; equal counts draw.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::core::{MatchConfig, Player, PlayerMap, Validate};
use crate::engine::{Input, Outcome, RoundCtx, RoundResult, Rules, Verdict};
use crate::games::{GameKind, Payload};
use crate::timing::Millis;

/// One countdown step.
const COUNTDOWN_STEP_MS: Millis = 1000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MashSettings {
    /// Length of the tapping window.
    pub duration_ms: Millis,
    /// Countdown digits shown before tapping opens.
    pub countdown_secs: u32,
    /// Pause between the last digit and the go-signal.
    pub countdown_gap_ms: Millis,
    pub flow: MatchConfig,
}

impl Default for MashSettings {
    fn default() -> Self {
        Self {
            duration_ms: 5000,
            countdown_secs: 3,
            countdown_gap_ms: 500,
            flow: MatchConfig::default().with_resolve_display(500),
        }
    }
}

impl MashSettings {
    #[must_use]
    pub fn with_duration(mut self, ms: Millis) -> Self {
        self.duration_ms = ms;
        self
    }

    #[must_use]
    pub fn with_countdown(mut self, secs: u32, gap_ms: Millis) -> Self {
        self.countdown_secs = secs;
        self.countdown_gap_ms = gap_ms;
        self
    }

    #[must_use]
    pub fn with_flow(mut self, flow: MatchConfig) -> Self {
        self.flow = flow;
        self
    }

    /// Time from start until tapping opens.
    #[must_use]
    pub fn lead_in_ms(&self) -> Millis {
        Millis::from(self.countdown_secs)
            .saturating_mul(COUNTDOWN_STEP_MS)
            .saturating_add(self.countdown_gap_ms)
    }
}

impl Validate for MashSettings {
    fn validate(&self) -> Result<()> {
        ensure!(self.duration_ms > 0, "tap rush needs a positive duration");
        self.flow.validate()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MashTimer {
    Countdown,
    Go,
    TimeUp,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MashView {
    /// Digit on screen during the countdown.
    pub countdown: Option<u32>,
    pub taps: PlayerMap<u32>,
    /// Time left while tapping is open.
    pub remaining_ms: Option<Millis>,
}

pub struct MashRules {
    settings: MashSettings,
    countdown: Option<u32>,
    taps: PlayerMap<u32>,
    ends_at: Option<Millis>,
}

impl MashRules {
    #[must_use]
    pub fn new(settings: MashSettings) -> Self {
        Self {
            settings,
            countdown: None,
            taps: PlayerMap::with_default(),
            ends_at: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &MashSettings {
        &self.settings
    }

    #[must_use]
    pub fn taps(&self) -> &PlayerMap<u32> {
        &self.taps
    }
}

impl Validate for MashRules {
    fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}

impl Rules for MashRules {
    type Timer = MashTimer;

    const KIND: GameKind = GameKind::Mash;

    fn flow(&self) -> &MatchConfig {
        &self.settings.flow
    }

    fn recognizes(&self, input: Input) -> bool {
        input == Input::Tap
    }

    fn begin_round(&mut self, ctx: &mut RoundCtx<'_, MashTimer>) {
        self.taps.clear();
        self.ends_at = None;

        if self.settings.countdown_secs > 0 {
            self.countdown = Some(self.settings.countdown_secs);
            ctx.after(COUNTDOWN_STEP_MS, MashTimer::Countdown);
        } else {
            self.countdown = None;
            ctx.after(self.settings.countdown_gap_ms, MashTimer::Go);
        }
    }

    fn on_timer(&mut self, timer: MashTimer, ctx: &mut RoundCtx<'_, MashTimer>) {
        match timer {
            MashTimer::Countdown => {
                let left = self.countdown.unwrap_or(1).saturating_sub(1);
                if left > 0 {
                    self.countdown = Some(left);
                    ctx.after(COUNTDOWN_STEP_MS, MashTimer::Countdown);
                } else {
                    self.countdown = None;
                    ctx.after(self.settings.countdown_gap_ms, MashTimer::Go);
                }
            }
            MashTimer::Go => {
                self.ends_at = Some(ctx.now().saturating_add(self.settings.duration_ms));
                ctx.activate();
                ctx.after(self.settings.duration_ms, MashTimer::TimeUp);
            }
            MashTimer::TimeUp => {
                log::debug!("mash: time up at {:?}", self.taps);
                let outcome = Outcome::from_leader(self.taps.leader());
                let delta = PlayerMap::new(|p| i64::from(self.taps[p]));
                ctx.resolve(RoundResult::new(outcome).with_delta(delta));
            }
        }
    }

    fn on_input(&mut self, player: Player, _input: Input, _ctx: &mut RoundCtx<'_, MashTimer>) -> Verdict {
        self.taps[player] += 1;
        Verdict::Accepted
    }

    fn match_over(&self, _scores: &PlayerMap<i64>, _round: u32) -> bool {
        true
    }

    fn payload(&self, now: Millis) -> Payload {
        Payload::Mash(MashView {
            countdown: self.countdown,
            taps: self.taps,
            remaining_ms: self.ends_at.map(|end| end.saturating_sub(now)),
        })
    }
}
