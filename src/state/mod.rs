pub mod game;
pub mod roast;
pub mod round;
mod sse;
pub mod standings;
pub mod state_machine;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::{
    config::AppConfig,
    dao::{game_store::GameStore, models::GameSnapshotEntity},
    error::ServiceError,
    state::{
        game::GameState,
        state_machine::{GameEvent, GamePhase},
    },
};

pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

const PUBLIC_SSE_CAPACITY: usize = 16;

/// Central application state: configuration, snapshot store, SSE hub and the
/// single tracked game.
pub struct AppState {
    config: Arc<AppConfig>,
    game_store: Arc<dyn GameStore>,
    sse: SseHub,
    game: RwLock<GameState>,
    transition_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The game starts in setup with the configured default target.
    pub fn new(config: AppConfig, game_store: Arc<dyn GameStore>) -> SharedState {
        let game = GameState::idle(config.default_target_score());
        Arc::new(Self {
            config: Arc::new(config),
            game_store,
            sse: SseHub::new(PUBLIC_SSE_CAPACITY),
            game: RwLock::new(game),
            transition_gate: Mutex::new(()),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Store mirroring the game snapshot.
    pub fn game_store(&self) -> Arc<dyn GameStore> {
        self.game_store.clone()
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Copy of the current game.
    pub async fn current_game(&self) -> GameState {
        self.game.read().await.clone()
    }

    /// Phase of the current game.
    pub async fn phase(&self) -> GamePhase {
        self.game.read().await.phase()
    }

    /// Replace the game without going through a transition (boot-time restore).
    pub async fn install_game(&self, game: GameState) {
        let _gate = self.transition_gate.lock().await;
        *self.game.write().await = game;
    }

    /// Run `work` against the current game as the transition `event`.
    ///
    /// Transitions are serialized: the phase is checked, `work` computes the
    /// next game, the resulting phase is checked against the plan, the game is
    /// swapped, the snapshot is written and `publish` runs, all before the
    /// next transition may start. Snapshot failures are logged only.
    pub async fn run_transition<W, P, T>(
        &self,
        event: GameEvent,
        work: W,
        publish: P,
    ) -> Result<(T, GamePhase), ServiceError>
    where
        W: FnOnce(&GameState) -> Result<(GameState, T), ServiceError>,
        P: FnOnce(&GameState, &T),
    {
        let _gate = self.transition_gate.lock().await;

        let (next, value, phase) = {
            let current = self.game.read().await;
            let plan = state_machine::plan(current.phase(), event)?;
            let (next, value) = work(&*current)?;
            let phase = plan.apply(next.phase())?;
            (next, value, phase)
        };

        *self.game.write().await = next.clone();
        debug!(event = ?event, phase = ?phase, round = next.current_round, "transition applied");

        self.persist(&next).await;
        publish(&next, &value);

        Ok((value, phase))
    }

    async fn persist(&self, game: &GameState) {
        let result = if game.started {
            self.game_store
                .save_snapshot(GameSnapshotEntity::from(game))
                .await
        } else {
            self.game_store.clear_snapshot().await
        };

        if let Err(err) = result {
            warn!(error = %err, "failed to persist game snapshot");
        }
    }
}
