//! Tagged round and match results.

use serde::{Deserialize, Serialize};

use crate::core::{Player, PlayerMap};
use crate::timing::Millis;

/// How a round or match was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A player won outright.
    Win { winner: Player },
    /// Both players finished level.
    Draw,
    /// A player acted before input was allowed; the opponent takes it.
    Foul { offender: Player },
    /// Both players failed; nobody takes it.
    NoContest,
}

impl Outcome {
    /// Outcome from a strict comparison: the leader wins, a tie draws.
    #[must_use]
    pub fn from_leader(leader: Option<Player>) -> Self {
        match leader {
            Some(winner) => Outcome::Win { winner },
            None => Outcome::Draw,
        }
    }

    /// The player credited with the win, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        match *self {
            Outcome::Win { winner } => Some(winner),
            Outcome::Foul { offender } => Some(offender.opponent()),
            Outcome::Draw | Outcome::NoContest => None,
        }
    }

    /// The player on the losing side, if any.
    #[must_use]
    pub fn loser(&self) -> Option<Player> {
        self.winner().map(Player::opponent)
    }

    #[must_use]
    pub fn is_foul(&self) -> bool {
        matches!(self, Outcome::Foul { .. })
    }
}

/// Result of one round, reported when the round resolves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round number within the match (starts at 1). Filled in by the engine.
    pub round: u32,
    pub outcome: Outcome,
    /// Added to the match scores.
    pub score_delta: PlayerMap<i64>,
    /// Time from the go-signal to the deciding input, where that applies.
    pub reaction_ms: Option<Millis>,
}

impl RoundResult {
    #[must_use]
    pub fn new(outcome: Outcome) -> Self {
        Self {
            round: 0,
            outcome,
            score_delta: PlayerMap::with_default(),
            reaction_ms: None,
        }
    }

    /// A round worth one point to whoever the outcome credits.
    #[must_use]
    pub fn point_to_winner(outcome: Outcome) -> Self {
        let mut result = Self::new(outcome);
        if let Some(winner) = outcome.winner() {
            result.score_delta[winner] = 1;
        }
        result
    }

    #[must_use]
    pub fn with_delta(mut self, delta: PlayerMap<i64>) -> Self {
        self.score_delta = delta;
        self
    }

    #[must_use]
    pub fn with_reaction(mut self, reaction_ms: Millis) -> Self {
        self.reaction_ms = Some(reaction_ms);
        self
    }
}

/// Result of a whole match, reported when the engine reaches `Ended`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub outcome: Outcome,
    pub scores: PlayerMap<i64>,
    pub rounds: u32,
}

/// What the engine hands to its reporter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Report {
    Round(RoundResult),
    Match(MatchResult),
}

impl Report {
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self {
            Report::Round(round) => round.outcome,
            Report::Match(m) => m.outcome,
        }
    }
}
