//! Shortening request/result entities.

use std::time::Duration;

/// Seconds in one expiry hour.
const SECONDS_PER_HOUR: u64 = 3600;

/// Input to [`crate::application::services::ShortenerService::shorten`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortenRequest {
    pub original_url: String,
    /// Caller-chosen short code. `None` (or empty) means generate one.
    pub custom_alias: Option<String>,
    /// Mapping lifetime in hours. `None` or `Some(0)` means the default.
    pub expiry_hours: Option<u64>,
}

impl ShortenRequest {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.custom_alias = Some(alias.into());
        self
    }

    pub fn with_expiry_hours(mut self, hours: u64) -> Self {
        self.expiry_hours = Some(hours);
        self
    }

    /// The alias to use, treating an empty string as absent.
    pub fn alias(&self) -> Option<&str> {
        self.custom_alias.as_deref().filter(|a| !a.is_empty())
    }
}

/// Output of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenResult {
    /// The normalized URL that was stored.
    pub original_url: String,
    pub short_code: String,
    pub expiry_hours: u64,
    /// Quota left in the current window after this request.
    pub rate_remaining: i64,
    /// Whole minutes until the quota window resets.
    pub rate_reset_minutes: u64,
}

/// Converts an expiry in hours to the mapping TTL.
pub fn expiry_ttl(expiry_hours: u64) -> Duration {
    Duration::from_secs(expiry_hours.saturating_mul(SECONDS_PER_HOUR))
}
