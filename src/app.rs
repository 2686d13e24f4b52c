use std::sync::Arc;

use anyhow::Context;
use bookstore_db::Database;
use bookstore_http::health::SharedProbe;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules::{self, books::repository::PgBookRepository};

/// Connect to the store, serve HTTP until a shutdown signal arrives, then
/// release the pool.
///
/// An unreachable store is fatal: no listener is bound until the startup
/// ping succeeds.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let database = Database::connect(&settings.database)
        .await
        .context("database unavailable; refusing to serve traffic")?;

    let served = serve(&settings, &database).await;

    database.shutdown().await;
    served
}

async fn serve(settings: &Settings, database: &Database) -> anyhow::Result<()> {
    let repository = Arc::new(PgBookRepository::new(database.pool().clone()));
    let probe: SharedProbe = Arc::new(database.pool().clone());

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, repository);

    let ctx = InitCtx { settings };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookstore_http::start_server(&registry, settings, probe, shutdown_signal()).await;

    registry.stop_all().await?;
    served
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
