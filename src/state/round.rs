//! Round resolution: validates a reported round and computes the next game state.

use indexmap::IndexMap;
use thiserror::Error;

use crate::state::{
    game::{GameState, PlayerId, first_reaching_target},
    state_machine::GamePhase,
};

/// Points entered for one player, as typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEntry {
    /// Nothing entered (absent, null, or blank).
    Empty,
    /// A non-negative integer.
    Points(u64),
    /// Anything else: negative, fractional, or not a number.
    Invalid,
}

/// Why a single player's entry was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreIssue {
    /// A losing player has no entry.
    Required,
    /// The entry is not a non-negative integer.
    Invalid,
    /// The round winner was given points.
    WinnerScored,
}

impl ScoreIssue {
    /// Field-level message shown next to the offending entry.
    pub fn message(self) -> &'static str {
        match self {
            ScoreIssue::Required => "Score required",
            ScoreIssue::Invalid => "Must be a non-negative number",
            ScoreIssue::WinnerScored => "The round winner does not receive a score entry",
        }
    }
}

/// Outcome reported by the operator for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundSubmission {
    /// Player who went out first.
    pub winner_id: Option<PlayerId>,
    /// Points left in every other player's hand.
    pub scores: IndexMap<PlayerId, ScoreEntry>,
}

/// A round that has been rejected; the game state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("rounds can only be resolved while a game is in progress (current phase {0:?})")]
    NotInProgress(GamePhase),
    #[error("Please select a round winner")]
    MissingWinner,
    #[error("round winner `{0}` is not part of the game")]
    UnknownWinner(PlayerId),
    #[error("scores reference players outside the game: {0:?}")]
    UnknownPlayers(Vec<PlayerId>),
    #[error("{} score entries need correcting", .0.len())]
    InvalidScores(IndexMap<PlayerId, ScoreIssue>),
    #[error("round total exceeds the supported score range")]
    ScoreOverflow,
}

/// Result of a successfully resolved round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    /// State after the round.
    pub game: GameState,
    /// Number of the round that was just resolved.
    pub round: u32,
    /// Player credited with the round total.
    pub round_winner_id: PlayerId,
    /// Sum of the loser entries, added to the round winner.
    pub points_awarded: u32,
    /// Validated loser entries in roster order.
    pub loser_scores: IndexMap<PlayerId, u32>,
}

impl RoundOutcome {
    /// Whether this round ended the game.
    pub fn ended_game(&self) -> bool {
        self.game.ended
    }
}

impl GameState {
    /// Apply one round to the game, returning the resulting state.
    ///
    /// The whole round is rejected when any entry is wrong; in that case no
    /// score changes and the round counter does not move.
    pub fn resolve_round(&self, submission: &RoundSubmission) -> Result<RoundOutcome, RoundError> {
        let phase = self.phase();
        if phase != GamePhase::InProgress {
            return Err(RoundError::NotInProgress(phase));
        }

        let winner_id = submission
            .winner_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(RoundError::MissingWinner)?;

        if self.player(winner_id).is_none() {
            return Err(RoundError::UnknownWinner(winner_id.to_string()));
        }

        let unknown = submission
            .scores
            .keys()
            .filter(|id| self.player(id).is_none())
            .cloned()
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            return Err(RoundError::UnknownPlayers(unknown));
        }

        let mut issues = IndexMap::new();
        let mut loser_scores = IndexMap::new();
        for player in &self.players {
            let entry = submission
                .scores
                .get(&player.id)
                .copied()
                .unwrap_or(ScoreEntry::Empty);

            if player.id == winner_id {
                if entry != ScoreEntry::Empty {
                    issues.insert(player.id.clone(), ScoreIssue::WinnerScored);
                }
                continue;
            }

            match entry {
                ScoreEntry::Empty => {
                    issues.insert(player.id.clone(), ScoreIssue::Required);
                }
                ScoreEntry::Invalid => {
                    issues.insert(player.id.clone(), ScoreIssue::Invalid);
                }
                ScoreEntry::Points(points) => match u32::try_from(points) {
                    Ok(points) => {
                        loser_scores.insert(player.id.clone(), points);
                    }
                    Err(_) => {
                        issues.insert(player.id.clone(), ScoreIssue::Invalid);
                    }
                },
            }
        }

        if !issues.is_empty() {
            return Err(RoundError::InvalidScores(issues));
        }

        let points_awarded = loser_scores
            .values()
            .try_fold(0u32, |total, points| total.checked_add(*points))
            .ok_or(RoundError::ScoreOverflow)?;

        let players = self
            .players
            .iter()
            .map(|player| {
                let mut player = player.clone();
                if player.id == winner_id {
                    player.score = player
                        .score
                        .checked_add(points_awarded)
                        .ok_or(RoundError::ScoreOverflow)?;
                }
                Ok(player)
            })
            .collect::<Result<Vec<_>, RoundError>>()?;

        let game_winner = first_reaching_target(&players, self.target_score).map(|p| p.id.clone());

        let game = GameState {
            players,
            target_score: self.target_score,
            current_round: self.current_round.saturating_add(1),
            started: true,
            ended: game_winner.is_some(),
            winner_id: game_winner,
        };

        Ok(RoundOutcome {
            game,
            round: self.current_round,
            round_winner_id: winner_id.to_string(),
            points_awarded,
            loser_scores,
        })
    }
}
