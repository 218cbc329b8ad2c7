use std::sync::Arc;

use anyhow::Context;
use chess_tourney::config::Config;
use chess_tourney::dispatch::Dispatcher;
use chess_tourney::registry::Registry;
use chess_tourney::server::{self, Stopped};
use chess_tourney::snapshot::Snapshot;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();

    let registry = match &config.snapshot_path {
        Some(path) if path.exists() => Snapshot::load(path)
            .and_then(Snapshot::restore)
            .with_context(|| format!("restoring {}", path.display()))?,
        _ => Registry::new(),
    };
    let registry = Arc::new(registry);
    tracing::info!(
        players = registry.player_count(),
        games = registry.game_count(),
        "registry ready"
    );

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    let stopped = server::run(
        listener,
        Dispatcher::new(registry.clone()),
        config.request_timeout,
        shutdown,
    )
    .await?;

    if let Some(path) = &config.snapshot_path {
        Snapshot::capture(&registry)
            .save(path)
            .with_context(|| format!("saving {}", path.display()))?;
    }

    match stopped {
        Stopped::Shutdown => Ok(()),
        Stopped::Fatal(e) => Err(e.into()),
    }
}
