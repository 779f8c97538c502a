use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::GamePhase;

/// Publicly visible game phase exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleGamePhase {
    /// No game yet; players are being entered.
    Setup,
    /// Rounds are being recorded.
    InProgress,
    /// Someone reached the target.
    Finished,
}

impl From<GamePhase> for VisibleGamePhase {
    fn from(value: GamePhase) -> Self {
        match value {
            GamePhase::Setup => VisibleGamePhase::Setup,
            GamePhase::InProgress => VisibleGamePhase::InProgress,
            GamePhase::Finished => VisibleGamePhase::Finished,
        }
    }
}
