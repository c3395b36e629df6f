//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with per-keyspace checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Both keyspaces reachable
/// - **503 Service Unavailable**: One or both unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "codes":  { "status": "ok", "message": "codes store reachable" },
///     "limits": { "status": "ok", "message": "limits store reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (codes_ok, limits_ok) = state.shortener.health().await;

    let codes = CheckStatus::from_probe(codes_ok, "codes");
    let limits = CheckStatus::from_probe(limits_ok, "limits");
    let all_healthy = codes.is_ok() && limits.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { codes, limits },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        tracing::warn!(codes_ok, limits_ok, "Health check degraded");
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
