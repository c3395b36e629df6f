//! API route configuration.

use crate::api::handlers::shorten_handler;
use crate::state::AppState;
use axum::{Router, routing::post};

/// Versioned API routes, nested under `/api` by the top-level router.
///
/// # Endpoints
///
/// - `POST /v1/shorten` - Create a short link
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/v1/shorten", post(shorten_handler))
}
