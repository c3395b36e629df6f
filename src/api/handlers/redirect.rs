//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Resolution is counted in the global stats counter in the background; a
/// failure there never affects the redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist or has expired.
/// Returns 500 if the store is unreachable.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let url = state.shortener.resolve(&code).await?;

    Ok(Redirect::temporary(&url))
}
