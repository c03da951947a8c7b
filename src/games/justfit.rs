//! Just Fit.
//!
//! Each player has a cursor bouncing along a rail. Each player taps to
//! stop their cursor as close to the target centre as they can. Each
//! round runs faster than the last. Points add up over three rounds.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::core::{MatchConfig, Player, PlayerMap, Validate};
use crate::engine::{Input, Outcome, RoundCtx, RoundResult, Rules, Verdict};
use crate::games::{GameKind, Payload};
use crate::timing::Millis;

/// Rail ends, in percent.
const RAIL_MIN: f64 = 0.0;
const RAIL_MAX: f64 = 100.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JustFitSettings {
    pub rounds: u32,
    /// Cursor speed in round one, in percent of the rail per frame.
    pub base_speed: f64,
    /// Added to the speed each round.
    pub speed_increment: f64,
    /// Centre of the target zone on the rail.
    pub target_center: f64,
    /// Presentation hint: width of the target zone.
    pub target_width: f64,
    /// Presentation hint: width of the cursor.
    pub cursor_width: f64,
    /// Reference frame length for `base_speed`.
    pub frame_ms: f64,
    /// Frames further apart than this do not move the cursors.
    pub max_frame_gap_ms: Millis,
    pub flow: MatchConfig,
}

impl Default for JustFitSettings {
    fn default() -> Self {
        Self {
            rounds: 3,
            base_speed: 1.5,
            speed_increment: 0.5,
            target_center: 50.0,
            target_width: 12.0,
            cursor_width: 4.0,
            frame_ms: 16.66,
            max_frame_gap_ms: 100,
            flow: MatchConfig::default(),
        }
    }
}

impl JustFitSettings {
    #[must_use]
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, base: f64, increment: f64) -> Self {
        self.base_speed = base;
        self.speed_increment = increment;
        self
    }

    #[must_use]
    pub fn with_flow(mut self, flow: MatchConfig) -> Self {
        self.flow = flow;
        self
    }

    /// Cursor speed for `round` (starts at 1).
    #[must_use]
    pub fn speed_for(&self, round: u32) -> f64 {
        self.base_speed + self.speed_increment * f64::from(round.saturating_sub(1))
    }
}

impl Validate for JustFitSettings {
    fn validate(&self) -> Result<()> {
        ensure!(self.rounds > 0, "just fit needs at least one round");
        ensure!(self.base_speed > 0.0, "cursor speed must be positive");
        ensure!(self.speed_increment >= 0.0, "cursor speed must not drop between rounds");
        ensure!(self.frame_ms > 0.0, "frame length must be positive");
        ensure!(
            (RAIL_MIN..=RAIL_MAX).contains(&self.target_center),
            "target centre {} is off the rail",
            self.target_center
        );
        self.flow.validate()
    }
}

/// How close a stop landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    Perfect,
    Great,
    Good,
    Miss,
}

impl Grade {
    /// Grade and points for a stop `distance` away from the target centre.
    ///
    /// ```
    /// use party_duel::games::justfit::Grade;
    ///
    /// assert_eq!(Grade::score(1.0), (Grade::Perfect, 100));
    /// assert_eq!(Grade::score(5.0), (Grade::Great, 70));
    /// assert_eq!(Grade::score(12.5), (Grade::Good, 38));
    /// assert_eq!(Grade::score(30.0), (Grade::Miss, 10));
    /// ```
    #[must_use]
    pub fn score(distance: f64) -> (Grade, i64) {
        let distance = distance.abs();
        if distance <= 2.5 {
            (Grade::Perfect, 100)
        } else if distance <= 8.0 {
            (Grade::Great, 80 - (distance * 2.0).floor() as i64)
        } else if distance <= 20.0 {
            (Grade::Good, 50 - distance.floor() as i64)
        } else {
            (Grade::Miss, 10)
        }
    }
}

/// A cursor bouncing between the rail ends.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub position: f64,
    /// +1 towards 100, -1 towards 0.
    pub direction: f64,
    pub stopped: bool,
}

impl Cursor {
    /// A cursor parked at one end, heading for the other.
    #[must_use]
    pub fn at_end(from_max: bool) -> Self {
        if from_max {
            Self { position: RAIL_MAX, direction: -1.0, stopped: false }
        } else {
            Self { position: RAIL_MIN, direction: 1.0, stopped: false }
        }
    }

    /// Move by `step` along the current direction, bouncing off the ends.
    pub fn advance(&mut self, step: f64) {
        if self.stopped {
            return;
        }
        self.position += step * self.direction;
        if self.position >= RAIL_MAX {
            self.position = RAIL_MAX;
            self.direction = -1.0;
        }
        if self.position <= RAIL_MIN {
            self.position = RAIL_MIN;
            self.direction = 1.0;
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self { position: (RAIL_MIN + RAIL_MAX) / 2.0, direction: 1.0, stopped: false }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JustFitTimer {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JustFitView {
    pub cursors: PlayerMap<Cursor>,
    pub grades: PlayerMap<Option<Grade>>,
    pub round_points: PlayerMap<i64>,
    pub speed: f64,
    pub target_center: f64,
    pub target_width: f64,
    pub cursor_width: f64,
    pub rounds: u32,
}

pub struct JustFitRules {
    settings: JustFitSettings,
    cursors: PlayerMap<Cursor>,
    grades: PlayerMap<Option<Grade>>,
    points: PlayerMap<i64>,
    speed: f64,
    last_frame: Millis,
}

impl JustFitRules {
    #[must_use]
    pub fn new(settings: JustFitSettings) -> Self {
        let speed = settings.base_speed;
        Self {
            settings,
            cursors: PlayerMap::with_default(),
            grades: PlayerMap::with_default(),
            points: PlayerMap::with_default(),
            speed,
            last_frame: 0,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &JustFitSettings {
        &self.settings
    }

    #[must_use]
    pub fn cursor(&self, player: Player) -> Cursor {
        self.cursors[player]
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }
}

impl Validate for JustFitRules {
    fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}

impl Rules for JustFitRules {
    type Timer = JustFitTimer;

    const KIND: GameKind = GameKind::JustFit;

    fn flow(&self) -> &MatchConfig {
        &self.settings.flow
    }

    fn recognizes(&self, input: Input) -> bool {
        input == Input::Tap
    }

    fn begin_round(&mut self, ctx: &mut RoundCtx<'_, JustFitTimer>) {
        self.speed = self.settings.speed_for(ctx.round());
        for player in Player::all() {
            let from_max = ctx.rng().gen_bool(0.5);
            self.cursors[player] = Cursor::at_end(from_max);
        }
        self.grades.clear();
        self.points.clear();
        self.last_frame = ctx.now();
        ctx.activate();
    }

    fn on_timer(&mut self, timer: JustFitTimer, _ctx: &mut RoundCtx<'_, JustFitTimer>) {
        match timer {}
    }

    fn on_tick(&mut self, ctx: &mut RoundCtx<'_, JustFitTimer>) -> bool {
        let now = ctx.now();
        let dt = now.saturating_sub(self.last_frame);
        self.last_frame = now;
        if dt == 0 || dt > self.settings.max_frame_gap_ms {
            return false;
        }

        let step = self.speed * dt as f64 / self.settings.frame_ms;
        for (_, cursor) in self.cursors.iter_mut() {
            cursor.advance(step);
        }
        true
    }

    fn on_input(&mut self, player: Player, _input: Input, ctx: &mut RoundCtx<'_, JustFitTimer>) -> Verdict {
        let cursor = &mut self.cursors[player];
        cursor.stopped = true;
        let (grade, points) = Grade::score(cursor.position - self.settings.target_center);
        log::debug!("justfit: {} stopped at {:.1} ({:?})", player, cursor.position, grade);

        self.grades[player] = Some(grade);
        self.points[player] = points;
        ctx.lock(player);

        if Player::all().all(|p| ctx.is_locked(p)) {
            let outcome = Outcome::from_leader(self.points.leader());
            ctx.resolve(RoundResult::new(outcome).with_delta(self.points));
        }
        Verdict::Scored(points)
    }

    fn match_over(&self, _scores: &PlayerMap<i64>, round: u32) -> bool {
        round >= self.settings.rounds
    }

    fn payload(&self, _now: Millis) -> Payload {
        Payload::JustFit(JustFitView {
            cursors: self.cursors,
            grades: self.grades,
            round_points: self.points,
            speed: self.speed,
            target_center: self.settings.target_center,
            target_width: self.settings.target_width,
            cursor_width: self.settings.cursor_width,
            rounds: self.settings.rounds,
        })
    }
}
