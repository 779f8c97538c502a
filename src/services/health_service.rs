use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether snapshots can currently be written.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.game_store().health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "snapshot store health check failed");
            HealthResponse::degraded(err.to_string())
        }
    }
}
