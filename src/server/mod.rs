//! Axum HTTP host for the analyzer.
//!
//! Routes:
//! - `POST /api/analyze-chat`   `{ "text" }`
//! - `POST /api/analyze-image`  `{ "image", "mimeType"? }`
//! - `POST /api/analyze`        alias of analyze-chat
//! - the analyze routes again under `/.netlify/functions/` for the bundled frontend
//! - `GET /health`

mod handlers;

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::GuardConfig;
use crate::error::{Result, TruthGuardError};
use crate::generation::Analyzer;

pub use handlers::{
    handle_analyze_chat, handle_analyze_image, handle_health, ChatBody, ErrorBody, ImageBody,
};

/// Maximum request body size (10 MiB); base64 photos are large.
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;
/// Added to the analysis budget for the outer request timeout, which only
/// fires if something outside the analysis itself stalls.
pub const REQUEST_TIMEOUT_GRACE_SECS: u64 = 30;

const ROUTE_PREFIXES: &[&str] = &["/api", "/.netlify/functions"];

/// Shared state for all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub analyzer: Analyzer,
}

/// Build the router with body-limit, timeout and trace layers.
pub fn build_app(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(
        state
            .analyzer
            .config()
            .analysis_timeout_secs
            .saturating_add(REQUEST_TIMEOUT_GRACE_SECS),
    );
    let mut app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/analyze", post(handle_analyze_chat));

    for prefix in ROUTE_PREFIXES {
        app = app
            .route(&format!("{prefix}/analyze-chat"), post(handle_analyze_chat))
            .route(&format!("{prefix}/analyze-image"), post(handle_analyze_image));
    }

    app.with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Bind to the configured address and serve until Ctrl-C.
pub async fn run_server(config: GuardConfig) -> Result<()> {
    let addr: SocketAddr = config.bind_address().parse().map_err(|_| {
        TruthGuardError::Configuration(format!("invalid bind address '{}'", config.bind_address()))
    })?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let analyzer = Analyzer::from_config(config)?;
    run_server_with_listener(listener, analyzer).await
}

/// Serve on a pre-bound listener.
pub async fn run_server_with_listener(
    listener: tokio::net::TcpListener,
    analyzer: Analyzer,
) -> Result<()> {
    let local = listener.local_addr()?;
    info!(address = %local, "TruthGuard listening");
    info!("  POST /api/analyze-chat");
    info!("  POST /api/analyze-image");
    info!("  GET  /health");

    let app = build_app(AppState { analyzer });
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_limit_fits_phone_photos() {
        assert_eq!(MAX_BODY_SIZE, 10_485_760);
    }

    #[test]
    fn analysis_budget_fits_inside_request_timeout() {
        let config = GuardConfig::default();
        assert!(config.analysis_timeout_secs > config.timeout_secs);
        assert!(REQUEST_TIMEOUT_GRACE_SECS > 0);
    }
}
