//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`           - Short link redirect
//! - `GET  /health`           - Health check of both store keyspaces
//! - `POST /api/v1/shorten`   - Create a short link
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routed application with state applied.
///
/// Reserved segments (`health`, `api`) are static routes and always take
/// precedence over `/{code}`; custom aliases may not use them.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/api/v1/shorten/` and
/// `/abc/` reach the same handlers as their canonical forms.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
