//! Repository trait for global usage counters.

use crate::error::AppError;
use async_trait::async_trait;

/// Monotonic named counters in the limits keyspace.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Atomically increments the counter and returns the new value.
    async fn increment(&self, name: &str) -> Result<i64, AppError>;

    /// Reads the counter; absent counters read as zero.
    async fn read(&self, name: &str) -> Result<i64, AppError>;
}
