use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::dto::game::{PlayerSummary, StandingEntry};

/// Which screen a share link opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShareKind {
    /// Scoreboard of a game in progress.
    #[default]
    Game,
    /// Winner screen of a finished game.
    Winner,
}

impl ShareKind {
    /// Value used in the `type` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            ShareKind::Game => "game",
            ShareKind::Winner => "winner",
        }
    }

    /// Lenient parse used by the viewer: anything but `winner` opens the game view.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("winner") => ShareKind::Winner,
            _ => ShareKind::Game,
        }
    }
}

/// Query accepted by `GET /game/share`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShareLinkQuery {
    /// `game` (default) or `winner`.
    #[serde(rename = "type", default)]
    #[param(value_type = Option<ShareKind>)]
    pub kind: ShareKind,
}

/// Link plus the texts a native share sheet would show.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShareLinkResponse {
    pub url: String,
    pub title: String,
    pub text: String,
    pub kind: ShareKind,
}

/// Query accepted by `GET /shared`, exactly as found in a share link.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SharedViewQuery {
    /// JSON-encoded game payload.
    #[serde(default)]
    pub shared: Option<String>,
    /// `game` or `winner`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Read-only rendering of a shared game.
#[derive(Debug, Serialize, ToSchema)]
pub struct SharedGameView {
    /// View actually rendered; a winner link without a winner falls back to `game`.
    pub kind: ShareKind,
    pub round: u32,
    pub target_score: u32,
    pub standings: Vec<StandingEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerSummary>,
    /// Everyone but the winner, for the winner view.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runners_up: Vec<StandingEntry>,
    /// Taunt for the runners-up, on the winner view only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roast: Option<String>,
}

/// Outcome of decoding a shared payload. Undecodable payloads are a result, not a fault.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SharedViewResponse {
    /// Payload decoded into a consistent game.
    Valid(SharedGameView),
    /// Payload missing, unreadable or inconsistent.
    Invalid {
        /// Why the payload was refused.
        reason: String,
    },
}
