//! Redis-backed repositories.
//!
//! All repositories share a [`ConnectionManager`], which multiplexes
//! requests over one connection and reconnects transparently. Clones are
//! cheap and every operation clones it, as the commands need `&mut`.

mod mapping_repository;
mod quota_repository;
mod stats_repository;

pub use mapping_repository::RedisMappingRepository;
pub use quota_repository::RedisQuotaRepository;
pub use stats_repository::RedisStatsRepository;

use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::info;

use crate::error::AppError;

/// Connects to Redis and validates the connection with a PING.
///
/// # Errors
///
/// Returns [`AppError::StoreUnavailable`] if the URL is invalid, the
/// connection cannot be established, or the PING fails.
pub async fn connect(redis_url: &str) -> Result<ConnectionManager, AppError> {
    let client = Client::open(redis_url)
        .map_err(|e| AppError::store(format!("Failed to create Redis client: {e}")))?;

    let manager = ConnectionManager::new(client)
        .await
        .map_err(|e| AppError::store(format!("Failed to connect to Redis: {e}")))?;

    let mut test_conn = manager.clone();
    test_conn
        .ping::<()>()
        .await
        .map_err(|e| AppError::store(format!("Redis PING failed: {e}")))?;

    info!("✓ Connected to Redis");

    Ok(manager)
}

pub(crate) async fn ping(conn: &ConnectionManager) -> bool {
    let mut conn = conn.clone();
    conn.ping::<()>().await.is_ok()
}

/// Whole seconds for `EX`; Redis rejects a zero expiry.
pub(crate) fn expiry_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Converts a `PTTL` reply. Negative replies mean "missing" (-2) or
/// "no expiry" (-1).
pub(crate) fn pttl_to_duration(pttl: i64) -> Option<Duration> {
    u64::try_from(pttl).ok().map(Duration::from_millis)
}
