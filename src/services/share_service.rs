use thiserror::Error;
use tracing::{debug, info};
use url::form_urlencoded;

use crate::{
    dao::models::SharePayloadEntity,
    dto::{
        game::{PlayerSummary, StandingEntry},
        share::{ShareKind, ShareLinkResponse, SharedGameView, SharedViewQuery, SharedViewResponse},
    },
    error::ServiceError,
    state::{
        SharedState,
        game::{SchemaError, SharedGame},
        roast::pick_roast,
        standings::{runners_up, standings},
        state_machine::GamePhase,
    },
};

/// Reasons a shared payload cannot be displayed.
#[derive(Debug, Error)]
pub enum ShareDecodeError {
    #[error("no shared game in the link")]
    Missing,
    #[error("shared game is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("shared game is inconsistent: {0}")]
    Schema(#[from] SchemaError),
}

/// Build a share link for the current game.
///
/// `winner` links need a finished game; `game` links need a started one.
pub async fn share_link(
    state: &SharedState,
    kind: ShareKind,
) -> Result<ShareLinkResponse, ServiceError> {
    let game = state.current_game().await;
    match (game.phase(), kind) {
        (GamePhase::Setup, _) => {
            return Err(ServiceError::InvalidState("no game to share yet".into()));
        }
        (GamePhase::InProgress, ShareKind::Winner) => {
            return Err(ServiceError::InvalidState(
                "winner can only be shared once the game is over".into(),
            ));
        }
        _ => {}
    }

    let payload = SharePayloadEntity::from(&game);
    let encoded = serde_json::to_string(&payload)
        .map_err(|err| ServiceError::Internal(format!("failed to encode share payload: {err}")))?;

    let mut url = state.config().share_base_url().clone();
    url.query_pairs_mut()
        .append_pair("shared", &encoded)
        .append_pair("type", kind.as_str());

    let (title, text) = match game.winner().filter(|_| kind == ShareKind::Winner) {
        Some(winner) => (
            format!("🏆 {} Won UNO!", winner.name),
            format!(
                "{} just won our UNO game with {} points!",
                winner.name, winner.score
            ),
        ),
        None => (
            "🎮 UNO Game in Progress".to_string(),
            format!(
                "Join our UNO game! Currently on round {}",
                game.current_round
            ),
        ),
    };

    info!(kind = kind.as_str(), round = game.current_round, "share link generated");
    Ok(ShareLinkResponse {
        url: url.into(),
        title,
        text,
        kind,
    })
}

/// Decode a shared payload into a read-only view. Never fails: bad payloads
/// produce an `invalid` result.
pub fn view_shared(query: SharedViewQuery) -> SharedViewResponse {
    let requested = ShareKind::from_query(query.kind.as_deref());
    let game = match query.shared.as_deref().map(decode_payload) {
        Some(Ok(game)) => game,
        Some(Err(err)) => return invalid(err),
        None => return invalid(ShareDecodeError::Missing),
    };

    let winner = game.winner();
    let kind = match (requested, winner) {
        (ShareKind::Winner, None) => ShareKind::Game,
        (kind, _) => kind,
    };

    let (runners_up, roast) = match (kind, winner) {
        (ShareKind::Winner, Some(winner)) => (
            runners_up(&game.players, &winner.id, game.target_score)
                .into_iter()
                .map(StandingEntry::from)
                .collect(),
            Some(pick_roast().to_string()),
        ),
        _ => (Vec::new(), None),
    };

    SharedViewResponse::Valid(SharedGameView {
        kind,
        round: game.current_round,
        target_score: game.target_score,
        standings: standings(&game.players, game.target_score)
            .into_iter()
            .map(StandingEntry::from)
            .collect(),
        winner: winner.map(PlayerSummary::from),
        runners_up,
        roast,
    })
}

/// Parse and validate the `shared` query value.
///
/// Links built by hand sometimes carry the JSON percent-encoded twice; a
/// second decoding pass is attempted before giving up.
pub fn decode_payload(raw: &str) -> Result<SharedGame, ShareDecodeError> {
    let entity = match serde_json::from_str::<SharePayloadEntity>(raw) {
        Ok(entity) => entity,
        Err(err) if raw.contains('%') => {
            let decoded = form_urlencoded::parse(format!("v={raw}").as_bytes())
                .next()
                .map(|(_, value)| value.into_owned())
                .unwrap_or_default();
            serde_json::from_str(&decoded).map_err(|_| err)?
        }
        Err(err) => return Err(err.into()),
    };
    Ok(SharedGame::try_from(entity)?)
}

fn invalid(err: ShareDecodeError) -> SharedViewResponse {
    debug!(error = %err, "shared game rejected");
    SharedViewResponse::Invalid {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::state::roast::ROASTS;

    fn payload() -> serde_json::Value {
        json!({
            "players": [
                {"id": "player-0", "name": "Ann", "score": 40, "color": "#E53E3E"},
                {"id": "player-1", "name": "Bob", "score": 260, "color": "#FFD700"},
                {"id": "player-2", "name": "Cid", "score": 75, "color": "#3182CE"}
            ],
            "targetScore": 250,
            "currentRound": 6,
            "winner": {"id": "player-1", "name": "Bob", "score": 260, "color": "#FFD700"}
        })
    }

    fn query(shared: Option<String>, kind: Option<&str>) -> SharedViewQuery {
        SharedViewQuery {
            shared,
            kind: kind.map(String::from),
        }
    }

    #[test]
    fn winner_view_lists_runners_up() {
        let response = view_shared(query(Some(payload().to_string()), Some("winner")));
        let SharedViewResponse::Valid(view) = response else {
            panic!("expected a valid view");
        };
        assert_eq!(view.kind, ShareKind::Winner);
        assert_eq!(view.winner.unwrap().name, "Bob");
        let order = view
            .runners_up
            .iter()
            .map(|row| row.player.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["player-2", "player-0"]);
        assert!(ROASTS.contains(&view.roast.as_deref().unwrap()));
    }

    #[test]
    fn winner_view_without_winner_falls_back_to_game() {
        let mut data = payload();
        data["winner"] = serde_json::Value::Null;
        data["players"][1]["score"] = json!(120);

        let SharedViewResponse::Valid(view) =
            view_shared(query(Some(data.to_string()), Some("winner")))
        else {
            panic!("expected a valid view");
        };
        assert_eq!(view.kind, ShareKind::Game);
        assert!(view.winner.is_none());
        assert!(view.runners_up.is_empty());
        assert!(view.roast.is_none());
        assert_eq!(view.standings[0].player.id, "player-1");
    }

    #[test]
    fn garbage_is_reported_not_raised() {
        for shared in [None, Some("{oops".to_string()), Some("[]".to_string())] {
            let response = view_shared(query(shared, None));
            assert!(matches!(response, SharedViewResponse::Invalid { .. }));
        }
    }

    #[test]
    fn inconsistent_winner_is_rejected() {
        let mut data = payload();
        data["winner"]["id"] = json!("player-9");
        assert!(matches!(
            decode_payload(&data.to_string()),
            Err(ShareDecodeError::Schema(SchemaError::UnknownWinner(_)))
        ));
    }

    #[test]
    fn winner_must_be_first_in_roster_order_to_reach_target() {
        let mut data = payload();
        data["players"][0]["score"] = json!(255);
        assert!(matches!(
            decode_payload(&data.to_string()),
            Err(ShareDecodeError::Schema(SchemaError::WinnerNotFirst { .. }))
        ));

        data["winner"] = serde_json::Value::Null;
        let response = view_shared(query(Some(data.to_string()), Some("game")));
        assert!(matches!(response, SharedViewResponse::Invalid { .. }));
    }

    #[test]
    fn doubly_encoded_payload_is_accepted() {
        let once: String = form_urlencoded::byte_serialize(payload().to_string().as_bytes()).collect();
        let game = decode_payload(&once).unwrap();
        assert_eq!(game.players.len(), 3);
        assert_eq!(game.winner_id.as_deref(), Some("player-1"));
    }
}
