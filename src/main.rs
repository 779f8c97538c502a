//! UNO Score Back binary entrypoint wiring configuration, snapshot storage, REST and SSE layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uno_score_back::{
    build_router,
    config::AppConfig,
    dao::game_store::{GameStore, memory::MemoryGameStore},
    services::snapshot_service,
    state::AppState,
};

const EPHEMERAL_ENV: &str = "UNO_SCORE_EPHEMERAL";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let store = open_store(&config).await?;

    let app_state = AppState::new(config, store);
    let restored = snapshot_service::restore(&app_state).await;
    info!(outcome = ?restored, "game state ready");

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Pick the snapshot store: in memory when asked to, on disk otherwise.
async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn GameStore>> {
    let ephemeral = env::var(EPHEMERAL_ENV)
        .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);
    if ephemeral {
        info!("ephemeral mode; game will not survive a restart");
        return Ok(Arc::new(MemoryGameStore::new()));
    }

    #[cfg(feature = "file-store")]
    {
        use uno_score_back::dao::game_store::file::{FileGameStore, FileStoreConfig};

        let path = config.snapshot_path().clone();
        let store = FileGameStore::open(FileStoreConfig::new(path.clone()))
            .await
            .with_context(|| format!("opening snapshot store at {}", path.display()))?;
        info!(path = %path.display(), "snapshots written to disk");
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "file-store"))]
    {
        warn!(
            path = %config.snapshot_path().display(),
            "built without file-store; keeping snapshots in memory"
        );
        Ok(Arc::new(MemoryGameStore::new()))
    }
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; only Ctrl+C will stop the server");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
