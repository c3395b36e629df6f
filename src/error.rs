//! Application error taxonomy and its HTTP representation.
//!
//! Every failure a request can hit is one of the [`AppError`] variants. All of
//! them are terminal for the current request: nothing here is retried
//! internally, retry is left to the caller. Business outcomes
//! ([`AppError::AliasInUse`], [`AppError::QuotaExceeded`]) are kept distinct
//! from [`AppError::StoreUnavailable`] so a client can tell whether retrying
//! makes sense.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Can't do that: Domain error")]
    DomainRejected,

    #[error("Invalid custom short: {0}")]
    InvalidAlias(String),

    #[error("Invalid expiry: {0}")]
    InvalidExpiry(String),

    #[error("URL Custom short is already in use")]
    AliasInUse { code: String },

    #[error("Rate limit exceeded")]
    QuotaExceeded { reset_seconds: u64 },

    #[error("short-url not found in db")]
    NotFound { code: String },

    /// Carries the underlying store error for logging only; clients only
    /// ever see the generic message.
    #[error("Unable to connect to server")]
    StoreUnavailable(String),

    #[error("Could not determine client address")]
    MissingClientId,

    #[error("Invalid request: {0}")]
    Validation(String),
}

/// Serialized error body.
///
/// `error` is the human readable message, `code` a stable machine readable
/// identifier. `rate_limit_reset` (minutes) is only present for quota errors.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_reset: Option<u64>,
}

impl AppError {
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable(err.to_string())
    }

    /// Stable machine readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::DomainRejected => "domain_rejected",
            Self::InvalidAlias(_) => "invalid_alias",
            Self::InvalidExpiry(_) => "invalid_expiry",
            Self::AliasInUse { .. } => "alias_in_use",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::NotFound { .. } => "not_found",
            Self::StoreUnavailable(_) => "internal_error",
            Self::MissingClientId => "missing_client_id",
            Self::Validation(_) => "validation_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidUrl(_)
            | Self::DomainRejected
            | Self::InvalidAlias(_)
            | Self::InvalidExpiry(_)
            | Self::AliasInUse { .. }
            | Self::MissingClientId
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let rate_limit_reset = match self {
            Self::QuotaExceeded { reset_seconds } => Some(reset_seconds / 60),
            _ => None,
        };

        ErrorBody {
            error: self.to_string(),
            code: self.code(),
            rate_limit_reset,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::StoreUnavailable(ref cause) = self {
            error!(cause = %cause, "Store failure while handling request");
        }

        (self.status(), Json(self.to_body())).into_response()
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        Self::store(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Validation(e.to_string())
    }
}
