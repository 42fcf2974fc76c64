//! REST API server for meetmail.
//!
//! Provides HTTP endpoints for:
//! - Summary generation (POST /api/generate)
//! - Sharing a summary by email (POST /api/share)
//! - Health (GET /api/health)
//!
//! The browser UI is served from the configured static directory at `/`.

pub mod error;
pub mod routes;

use crate::config::Config;
use crate::mail::Mailer;
use crate::summary::CompletionProvider;
use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{info, warn};

pub use routes::generate::GenerateResponse;
pub use routes::share::ShareResponse;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub completion: Arc<dyn CompletionProvider>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(
        config: Config,
        completion: Arc<dyn CompletionProvider>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            completion,
            mailer,
        }
    }
}

/// Build the full application router for `state`.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;
    let body_limit = server.body_limit_bytes;
    let static_dir = server.static_dir.clone();

    let api = Router::new()
        .route("/health", get(health))
        .merge(routes::generate::router())
        .merge(routes::share::router());

    let mut app = Router::new().nest("/api", api).with_state(state);

    if Path::new(&static_dir).is_dir() {
        let assets = ServeDir::new(&static_dir).append_index_html_on_directories(true);
        app = app.fallback_service(assets);
    } else {
        warn!("Static directory {:?} not found; browser UI disabled", static_dir);
    }

    app.layer(
        ServiceBuilder::new()
            .layer(CorsLayer::permissive())
            .layer(DefaultBodyLimit::max(body_limit)),
    )
}

pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn start(self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.state.config.server.host, self.state.config.server.port
        );
        let app = build_router(self.state);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("API server listening on http://{}", addr);
        info!("Endpoints:");
        info!("  GET  /api/health   - Service info");
        info!("  POST /api/generate - Summarize a transcript");
        info!("  POST /api/share    - Email a summary");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": "meetmail",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
