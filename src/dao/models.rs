//! Serialized game shapes shared by the snapshot store and share links.
//!
//! Field names follow the camelCase JSON used by the tracker's front-end so
//! snapshots and share payloads stay readable by either side.

use serde::{Deserialize, Serialize};

/// Player as written to a snapshot or embedded in a share payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Identifier unique within the game.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Cumulative score.
    pub score: u32,
    /// Display color as `#RRGGBB`.
    pub color: String,
}

/// Full game record persisted after every state transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshotEntity {
    /// Players in join order.
    pub players: Vec<PlayerEntity>,
    /// Score a player must reach to win.
    pub target_score: u32,
    /// Round being played.
    pub current_round: u32,
    /// Whether a roster was submitted.
    pub game_started: bool,
    /// Whether a winner was declared.
    pub game_ended: bool,
    /// Copy of the winning player, when the game ended.
    #[serde(default)]
    pub winner: Option<PlayerEntity>,
}

/// Read-only game view embedded in share links.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SharePayloadEntity {
    /// Players in join order.
    pub players: Vec<PlayerEntity>,
    /// Score a player must reach to win.
    pub target_score: u32,
    /// Round being played.
    pub current_round: u32,
    /// Copy of the winning player, when the game ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerEntity>,
}
