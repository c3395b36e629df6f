//! Repository trait for the short code keyspace.

use crate::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

/// Access to `short code -> URL` mappings.
///
/// Records are created once and removed only by TTL expiry; there is no
/// update or delete path.
///
/// # Implementations
///
/// - [`crate::infrastructure::redis::RedisMappingRepository`] - Redis implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Returns `true` iff a live mapping exists for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Unconditionally stores `code -> url` expiring after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on connectivity or write failure.
    async fn put(&self, code: &str, url: &str, ttl: Duration) -> Result<(), AppError>;

    /// Stores `code -> url` only if no live mapping exists.
    ///
    /// Returns `Ok(false)` when another mapping already holds `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on connectivity or write failure.
    async fn put_if_absent(&self, code: &str, url: &str, ttl: Duration)
    -> Result<bool, AppError>;

    /// Fetches the URL stored under `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live mapping exists.
    /// Returns [`AppError::StoreUnavailable`] on connectivity failure.
    async fn get(&self, code: &str) -> Result<String, AppError>;

    /// Remaining lifetime of the mapping, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn ttl(&self, code: &str) -> Result<Option<Duration>, AppError>;

    /// Checks that the keyspace is reachable.
    async fn health_check(&self) -> bool;
}
