//! HTTP server assembly: flow routes, static assets, health probe and API docs.

use crate::AppState;
use crate::config::AppConfig;
use crate::flows::{self, FLOWS_TAG};
use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

/// Tag for OpenAPI documentation.
pub const MISC_TAG: &str = "Miscellaneous";

/// OpenAPI documentation configuration.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Login & Consent Provider",
        version = "1.0.0",
        description = "Browser-facing login, consent and logout endpoints for an OAuth2/OIDC authorization server."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = FLOWS_TAG, description = "Login, consent and logout flows")
    )
)]
pub struct ApiDoc;

/// Health check endpoint.
#[tracing::instrument()]
#[utoipa::path(
    method(get, head),
    path = "/healthz",
    tag = MISC_TAG,
    operation_id = "Health Check",
    summary = "Service health check",
    description = "Returns a simple health status indicating the service is running and accepting requests.",
    responses(
        (status = 200, description = "Service is healthy", body = str, content_type = "text/plain", example = "ok")
    )
)]
pub async fn health() -> &'static str {
    "ok"
}

/// Build the complete application router.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(flows::router(state))
        .routes(routes!(health))
        .split_for_parts();

    let mut router = router
        .merge(Redoc::with_url("/api-docs", api))
        .nest_service("/public", ServeDir::new(&config.public_assets_path));
    if let Some(static_path) = &config.custom_static_path {
        tracing::info!(path = %static_path.display(), "Serving custom static files under /static");
        router = router.nest_service("/static", ServeDir::new(static_path));
    }

    router.layer(TraceLayer::new_for_http())
}

/// Starts the web server and runs until a shutdown signal arrives.
#[tracing::instrument(skip(router))]
pub async fn start_webserver(router: Router, port: u16) -> color_eyre::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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
    tracing::info!("Shutdown signal received");
}
