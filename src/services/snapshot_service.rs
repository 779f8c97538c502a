use tracing::{info, warn};

use crate::{
    dao::storage::StorageError,
    state::{SharedState, game::GameState},
};

/// What happened to the stored snapshot at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A valid game was loaded.
    Restored,
    /// Nothing usable was stored.
    Empty,
    /// The snapshot was unreadable or inconsistent and has been cleared.
    Discarded,
    /// The store could not be reached; the default game is used.
    Unavailable,
}

/// Load the persisted game into the shared state.
///
/// Never fails: anything that prevents a restore leaves the default game in
/// place. Malformed or inconsistent snapshots are cleared so the next save
/// starts from a clean slate.
pub async fn restore(state: &SharedState) -> RestoreOutcome {
    let store = state.game_store();

    let entity = match store.load_snapshot().await {
        Ok(Some(entity)) => entity,
        Ok(None) => {
            info!("no saved game found");
            return RestoreOutcome::Empty;
        }
        Err(err @ StorageError::Malformed { .. }) => {
            warn!(error = %err, "saved game is unreadable; starting fresh");
            discard(state).await;
            return RestoreOutcome::Discarded;
        }
        Err(err) => {
            warn!(error = %err, "failed to load saved game; starting fresh");
            return RestoreOutcome::Unavailable;
        }
    };

    if !entity.game_started {
        info!("saved game was never started; ignoring it");
        return RestoreOutcome::Empty;
    }

    match GameState::try_from(entity) {
        Ok(game) => {
            info!(
                players = game.players.len(),
                round = game.current_round,
                ended = game.ended,
                "saved game restored"
            );
            state.install_game(game).await;
            RestoreOutcome::Restored
        }
        Err(err) => {
            warn!(error = %err, "saved game is inconsistent; starting fresh");
            discard(state).await;
            RestoreOutcome::Discarded
        }
    }
}

async fn discard(state: &SharedState) {
    if let Err(err) = state.game_store().clear_snapshot().await {
        warn!(error = %err, "failed to clear discarded snapshot");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::game_store::{GameStore, memory::MemoryGameStore},
        state::{AppState, state_machine::GamePhase},
    };

    fn app_with(store: &MemoryGameStore) -> SharedState {
        AppState::new(AppConfig::default(), Arc::new(store.clone()))
    }

    fn snapshot(winner: serde_json::Value, ended: bool) -> Vec<u8> {
        json!({
            "players": [
                {"id": "player-0", "name": "Ann", "score": 260, "color": "#E53E3E"},
                {"id": "player-1", "name": "Bob", "score": 12, "color": "#FFD700"}
            ],
            "targetScore": 250,
            "currentRound": 4,
            "gameStarted": true,
            "gameEnded": ended,
            "winner": winner
        })
        .to_string()
        .into_bytes()
    }

    #[tokio::test]
    async fn finished_game_is_restored() {
        let winner = json!({"id": "player-0", "name": "Ann", "score": 260, "color": "#E53E3E"});
        let store = MemoryGameStore::with_raw(snapshot(winner, true));
        let state = app_with(&store);

        assert_eq!(restore(&state).await, RestoreOutcome::Restored);
        let game = state.current_game().await;
        assert_eq!(game.phase(), GamePhase::Finished);
        assert_eq!(game.winner().unwrap().name, "Ann");
        assert_eq!(game.current_round, 4);
    }

    #[tokio::test]
    async fn garbage_is_cleared_and_defaults_kept() {
        let store = MemoryGameStore::with_raw("definitely not json");
        let state = app_with(&store);

        assert_eq!(restore(&state).await, RestoreOutcome::Discarded);
        assert_eq!(state.phase().await, GamePhase::Setup);
        assert!(store.raw().unwrap().is_none());
    }

    #[tokio::test]
    async fn ended_flag_without_winner_is_discarded() {
        let store = MemoryGameStore::with_raw(snapshot(serde_json::Value::Null, true));
        let state = app_with(&store);

        assert_eq!(restore(&state).await, RestoreOutcome::Discarded);
        assert_eq!(state.current_game().await, GameState::default());
    }

    #[tokio::test]
    async fn running_game_past_the_target_is_discarded() {
        let store = MemoryGameStore::with_raw(snapshot(serde_json::Value::Null, false));
        let state = app_with(&store);

        assert_eq!(restore(&state).await, RestoreOutcome::Discarded);
        assert_eq!(state.phase().await, GamePhase::Setup);
        assert!(store.raw().unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_store_keeps_defaults() {
        let store = MemoryGameStore::new();
        let state = app_with(&store);
        assert_eq!(restore(&state).await, RestoreOutcome::Empty);
        assert!(store.load_snapshot().await.unwrap().is_none());
    }
}
