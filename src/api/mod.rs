//! REST API over a computed quote.
//!
//! Endpoints:
//! - `GET /quote`: the quote computed at startup
//! - `GET /cashflow`: its yearly records with optional range filtering
//! - `POST /calculate`: computes a fresh quote for the posted roof

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::config::CalculatorConfig;
use crate::quote::Quote;

pub use types::{CalculateRequest, CashflowQuery, CashflowRecord, ErrorResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once after the startup calculation and wrapped in `Arc`; nothing
/// is mutated afterwards.
pub struct AppState {
    /// Configuration used for startup and posted calculations.
    pub config: CalculatorConfig,
    /// Quote computed at startup, if any.
    pub quote: Option<Quote>,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/quote", get(handlers::get_quote))
        .route("/cashflow", get(handlers::get_cashflow))
        .route("/calculate", post(handlers::post_calculate))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
