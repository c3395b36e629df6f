//! Repository trait for per-client quota counters.

use crate::domain::entities::QuotaSnapshot;
use crate::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

/// Atomic counter primitives over the limits keyspace.
///
/// The quota protocol itself lives in
/// [`crate::application::services::RateLimiter`]; implementations only
/// expose the store's native operations so that the decrement is atomic on
/// the store side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuotaRepository: Send + Sync {
    /// Creates the counter with `quota` and `window` expiry if it is absent.
    ///
    /// Returns `Ok(true)` if this call created it.
    async fn init_if_absent(
        &self,
        client_id: &str,
        quota: i64,
        window: Duration,
    ) -> Result<bool, AppError>;

    /// Reads the counter and its remaining lifetime, `None` if absent.
    async fn read(&self, client_id: &str) -> Result<Option<QuotaSnapshot>, AppError>;

    /// Atomically decrements an existing counter and returns the new value.
    ///
    /// Returns `Ok(None)` without creating anything if the counter is absent
    /// (its window expired), so an expired key is never resurrected without
    /// a TTL.
    async fn decrement(&self, client_id: &str) -> Result<Option<i64>, AppError>;

    /// Atomically increments an existing counter and returns the new value.
    ///
    /// Same absent-key semantics as [`QuotaRepository::decrement`].
    async fn increment(&self, client_id: &str) -> Result<Option<i64>, AppError>;

    /// Sets the counter's expiry to `window` from now.
    async fn expire(&self, client_id: &str, window: Duration) -> Result<(), AppError>;

    /// Checks that the keyspace is reachable.
    async fn health_check(&self) -> bool;
}
