//! HTTP server facade for the bookstore service with Axum, error handling, and
//! OpenAPI support.

use std::future::Future;

use anyhow::Context;
use axum::Router;

use bookstore_kernel::{
    settings::{Environment, Settings},
    ModuleRegistry,
};

pub mod error;
pub mod health;
pub mod router;

use health::SharedProbe;
use router::RouterBuilder;

/// Start the HTTP server and serve until `shutdown` resolves.
///
/// In-flight requests are drained before this returns.
pub async fn start_server<F>(
    registry: &ModuleRegistry,
    settings: &Settings,
    probe: SharedProbe,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(registry, settings, probe);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server drained");
    Ok(())
}

/// Build the main HTTP router with the health route and all module routes
/// mounted, middleware applied last so it wraps everything.
pub fn build_router(registry: &ModuleRegistry, settings: &Settings, probe: SharedProbe) -> Router {
    let mut router_builder = RouterBuilder::new().merge(health::routes(probe));

    for module in registry.modules() {
        let module_name = module.name();
        tracing::info!(
            module = module_name,
            "mounting module routes under {}/{}",
            router::API_PREFIX,
            module_name
        );
        router_builder = router_builder.mount_module(module_name, module.routes());
    }

    if settings.environment == Environment::Production {
        tracing::warn!("permissive CORS is enabled; restrict allowed origins before exposing this service");
    }

    router_builder
        .with_openapi(registry)
        .with_cors()
        .with_request_id()
        .with_tracing()
        .build()
}
