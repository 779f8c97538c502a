use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        game::{GameSummary, PlayerSummary, StandingEntry},
        now_rfc3339,
        sse::{GameResetEvent, GameStartedEvent, GameWonEvent, RoundResolvedEvent, ServerEvent},
    },
    state::{
        SharedState,
        game::GameState,
        roast::pick_roast,
        round::RoundOutcome,
        standings::{runners_up, standings},
    },
};

const EVENT_GAME_STARTED: &str = "game.started";
const EVENT_ROUND_RESOLVED: &str = "round.resolved";
const EVENT_GAME_WON: &str = "game.won";
const EVENT_GAME_RESET: &str = "game.reset";

/// Broadcast the roster of a freshly started game.
pub fn broadcast_game_started(state: &SharedState, game: &GameState) {
    let payload = GameStartedEvent {
        game: GameSummary::from(game),
    };
    send_public_event(state, EVENT_GAME_STARTED, &payload);
}

/// Broadcast a recorded round, followed by `game.won` when it ended the game.
pub fn broadcast_round_resolved(state: &SharedState, outcome: &RoundOutcome) {
    let game = &outcome.game;
    let payload = RoundResolvedEvent {
        round: outcome.round,
        round_winner_id: outcome.round_winner_id.clone(),
        points_awarded: outcome.points_awarded,
        resolved_at: now_rfc3339(),
        standings: standing_entries(game),
    };
    send_public_event(state, EVENT_ROUND_RESOLVED, &payload);

    if let Some(winner) = game.winner() {
        let payload = GameWonEvent {
            winner: PlayerSummary::from(winner),
            round: outcome.round,
            runners_up: runners_up(&game.players, &winner.id, game.target_score)
                .into_iter()
                .map(StandingEntry::from)
                .collect(),
            roast: pick_roast().to_string(),
        };
        send_public_event(state, EVENT_GAME_WON, &payload);
    }
}

/// Broadcast that the game was discarded.
pub fn broadcast_game_reset(state: &SharedState, game: &GameState) {
    let payload = GameResetEvent {
        target_score: game.target_score,
    };
    send_public_event(state, EVENT_GAME_RESET, &payload);
}

fn standing_entries(game: &GameState) -> Vec<StandingEntry> {
    standings(&game.players, game.target_score)
        .into_iter()
        .map(StandingEntry::from)
        .collect()
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
