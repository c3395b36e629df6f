//! DTOs for the link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{ShortenRequest as DomainShortenRequest, ShortenResult};

/// Request to shorten a single URL.
///
/// ```json
/// { "url": "example.com/some/page", "short": "my-link", "expiry": 48 }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// URL to shorten. A missing scheme is accepted and upgraded to `https`.
    #[validate(length(min = 1, max = 2048, message = "url must be 1 to 2048 characters"))]
    pub url: String,

    /// Optional custom short code.
    #[serde(default)]
    pub short: Option<String>,

    /// Optional lifetime in hours; absent or `0` means the default.
    #[serde(default)]
    pub expiry: Option<u64>,
}

impl From<ShortenRequest> for DomainShortenRequest {
    fn from(dto: ShortenRequest) -> Self {
        Self {
            original_url: dto.url,
            custom_alias: dto.short,
            expiry_hours: dto.expiry,
        }
    }
}

/// Successful shorten response.
///
/// `rate_limit` is the quota left in the current window, `rate_limit_reset`
/// the minutes until the window resets.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortenResponse {
    pub url: String,
    pub short: String,
    pub expiry: u64,
    pub rate_limit: i64,
    pub rate_limit_reset: u64,
}

impl ShortenResponse {
    pub fn new(result: ShortenResult, short_url: String) -> Self {
        Self {
            url: result.original_url,
            short: short_url,
            expiry: result.expiry_hours,
            rate_limit: result.rate_remaining,
            rate_limit_reset: result.rate_reset_minutes,
        }
    }
}
