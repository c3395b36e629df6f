//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::ClientId;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /api/v1/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "http://example.com/a",
///   "short": "my-link",   // optional
///   "expiry": 48          // optional, hours
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "https://example.com/a",
///   "short": "localhost:3000/my-link",
///   "expiry": 48,
///   "rate_limit": 9,
///   "rate_limit_reset": 30
/// }
/// ```
///
/// # Errors
///
/// - 400 for malformed bodies, invalid URLs, rejected domains, bad aliases
///   or expiry, aliases already in use, and unresolvable clients
/// - 429 when the client's quota is spent (`rate_limit_reset` in the body)
/// - 500 when the store is unreachable
pub async fn shorten_handler(
    State(state): State<AppState>,
    client_id: ClientId,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    payload.validate()?;

    let result = state
        .shortener
        .shorten(client_id.as_deref(), payload.into())
        .await?;

    let short_url = state.shortener.short_url(&result.short_code);

    Ok(Json(ShortenResponse::new(result, short_url)))
}
