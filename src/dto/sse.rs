use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::game::{GameSummary, PlayerSummary, StandingEntry};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of this connection.
    pub client_id: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Game as it stands when the client connects.
    pub game: GameSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a roster is submitted.
pub struct GameStartedEvent {
    pub game: GameSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after every recorded round.
pub struct RoundResolvedEvent {
    pub round: u32,
    pub round_winner_id: String,
    pub points_awarded: u32,
    /// RFC 3339 timestamp of the recording.
    pub resolved_at: String,
    pub standings: Vec<StandingEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a player reaches the target.
pub struct GameWonEvent {
    pub winner: PlayerSummary,
    pub round: u32,
    pub runners_up: Vec<StandingEntry>,
    /// Taunt for the runners-up.
    pub roast: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the game is discarded.
pub struct GameResetEvent {
    pub target_score: u32,
}
