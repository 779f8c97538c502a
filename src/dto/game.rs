use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::{phase::VisibleGamePhase, validation::validate_player_names},
    state::{
        game::{GameState, Player},
        round::{RoundOutcome, RoundSubmission, ScoreEntry},
        standings::Standing,
    },
};

/// Payload used to start a new game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct StartGameRequest {
    /// Name entries in join order; blank entries are ignored.
    #[validate(custom(function = "validate_player_names"))]
    pub players: Vec<String>,
    /// Score to reach. Defaults to the configured target.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub target_score: Option<u32>,
}

/// Outcome of one round as entered by the operator.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubmitRoundRequest {
    /// Player who went out.
    #[serde(default)]
    pub winner_id: Option<String>,
    /// Points left in each other player's hand, keyed by player id.
    /// Values may be numbers, numeric strings, `null` or blank strings.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub scores: IndexMap<String, Value>,
}

impl From<SubmitRoundRequest> for RoundSubmission {
    fn from(value: SubmitRoundRequest) -> Self {
        Self {
            winner_id: value.winner_id,
            scores: value
                .scores
                .into_iter()
                .map(|(id, raw)| {
                    let entry = score_entry(&raw);
                    (id, entry)
                })
                .collect(),
        }
    }
}

/// Interpret a raw score field the way the entry form does.
fn score_entry(raw: &Value) -> ScoreEntry {
    match raw {
        Value::Null => ScoreEntry::Empty,
        Value::Number(number) => number
            .as_u64()
            .map(ScoreEntry::Points)
            .unwrap_or(ScoreEntry::Invalid),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                ScoreEntry::Empty
            } else {
                text.parse::<u64>()
                    .map(ScoreEntry::Points)
                    .unwrap_or(ScoreEntry::Invalid)
            }
        }
        _ => ScoreEntry::Invalid,
    }
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq, Eq)]
/// Public projection of a player exposed to REST/SSE clients.
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
    pub score: u32,
    pub color: String,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            score: player.score,
            color: player.color.clone(),
        }
    }
}

/// Current game as seen by the operator screens.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummary {
    pub phase: VisibleGamePhase,
    pub players: Vec<PlayerSummary>,
    pub target_score: u32,
    pub current_round: u32,
    pub winner: Option<PlayerSummary>,
}

impl From<&GameState> for GameSummary {
    fn from(game: &GameState) -> Self {
        Self {
            phase: game.phase().into(),
            players: game.players.iter().map(PlayerSummary::from).collect(),
            target_score: game.target_score,
            current_round: game.current_round,
            winner: game.winner().map(PlayerSummary::from),
        }
    }
}

/// Response returned once a round has been recorded.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundResultResponse {
    /// Number of the round that was just recorded.
    pub round: u32,
    pub round_winner_id: String,
    /// Points credited to the round winner.
    pub points_awarded: u32,
    /// Validated loser entries in roster order.
    pub loser_scores: IndexMap<String, u32>,
    pub game_ended: bool,
    pub game: GameSummary,
}

impl From<&RoundOutcome> for RoundResultResponse {
    fn from(outcome: &RoundOutcome) -> Self {
        Self {
            round: outcome.round,
            round_winner_id: outcome.round_winner_id.clone(),
            points_awarded: outcome.points_awarded,
            loser_scores: outcome.loser_scores.clone(),
            game_ended: outcome.ended_game(),
            game: GameSummary::from(&outcome.game),
        }
    }
}

/// One scoreboard row.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct StandingEntry {
    pub rank: usize,
    pub player: PlayerSummary,
    pub is_leader: bool,
    pub progress_percent: u8,
    pub points_to_win: u32,
    pub reached_target: bool,
}

impl From<Standing> for StandingEntry {
    fn from(standing: Standing) -> Self {
        Self {
            rank: standing.rank,
            player: PlayerSummary::from(&standing.player),
            is_leader: standing.is_leader,
            progress_percent: standing.progress_percent,
            points_to_win: standing.points_to_win,
            reached_target: standing.reached_target,
        }
    }
}

/// Scoreboard for the current game.
#[derive(Debug, Serialize, ToSchema)]
pub struct StandingsResponse {
    pub phase: VisibleGamePhase,
    pub target_score: u32,
    pub current_round: u32,
    pub standings: Vec<StandingEntry>,
}
