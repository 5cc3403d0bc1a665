//! SnipCat HTTP server

use anyhow::{anyhow, Context};
use snipcat_core::logging_facility;
use snipcat_server::{build_router, AppState, ServerConfig};
use snipcat_store::seed::import_default_seed;
use snipcat_store::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("loading configuration")?;
    logging_facility::init(config.profile().map_err(|e| anyhow!(e))?);

    let mut store = SqliteStore::open(&config.database)
        .with_context(|| format!("opening catalog {}", config.database.display()))?;

    if config.seed_on_start {
        let outcome = import_default_seed(store.connection_mut(), false)?;
        if !outcome.skipped {
            tracing::info!(
                digest = %outcome.digest,
                categories = outcome.categories_created,
                snippets = outcome.snippets_created,
                "seeded empty catalog"
            );
        }
    }

    let app = build_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!(bind = %config.bind, "snipcat server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
