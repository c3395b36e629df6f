//! Redis implementation of [`QuotaRepository`].

use async_trait::async_trait;
use redis::{AsyncCommands, Script, Value, aio::ConnectionManager};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

use super::{expiry_secs, ping, pttl_to_duration};
use crate::domain::entities::QuotaSnapshot;
use crate::domain::repositories::QuotaRepository;
use crate::error::AppError;
use crate::infrastructure::keys::quota_key;

/// `INCRBY` that only touches an existing key. Plain `DECR` on a key that
/// expired a moment earlier would recreate it without a TTL.
static ADJUST_EXISTING: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return redis.call('INCRBY', KEYS[1], ARGV[1])
end
return false
",
    )
});

/// Quota counters stored as integer keys whose TTL is the window.
#[derive(Clone)]
pub struct RedisQuotaRepository {
    conn: ConnectionManager,
}

impl RedisQuotaRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    async fn adjust(&self, client_id: &str, delta: i64) -> Result<Option<i64>, AppError> {
        let mut conn = self.conn.clone();
        let value: Option<i64> = ADJUST_EXISTING
            .key(quota_key(client_id))
            .arg(delta)
            .invoke_async(&mut conn)
            .await?;
        Ok(value)
    }
}

#[async_trait]
impl QuotaRepository for RedisQuotaRepository {
    async fn init_if_absent(
        &self,
        client_id: &str,
        quota: i64,
        window: Duration,
    ) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        let reply: Value = redis::cmd("SET")
            .arg(quota_key(client_id))
            .arg(quota)
            .arg("NX")
            .arg("EX")
            .arg(expiry_secs(window))
            .query_async(&mut conn)
            .await?;

        let created = !matches!(reply, Value::Nil);
        if created {
            debug!(client_id = %client_id, quota, "Quota counter created");
        }
        Ok(created)
    }

    async fn read(&self, client_id: &str) -> Result<Option<QuotaSnapshot>, AppError> {
        let key = quota_key(client_id);
        let mut conn = self.conn.clone();
        let (remaining, pttl): (Option<i64>, i64) = redis::pipe()
            .atomic()
            .get(&key)
            .pttl(&key)
            .query_async(&mut conn)
            .await?;

        Ok(remaining.map(|remaining| QuotaSnapshot {
            remaining,
            ttl: pttl_to_duration(pttl),
        }))
    }

    async fn decrement(&self, client_id: &str) -> Result<Option<i64>, AppError> {
        self.adjust(client_id, -1).await
    }

    async fn increment(&self, client_id: &str) -> Result<Option<i64>, AppError> {
        self.adjust(client_id, 1).await
    }

    async fn expire(&self, client_id: &str, window: Duration) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let secs = i64::try_from(expiry_secs(window)).unwrap_or(i64::MAX);
        conn.expire::<_, ()>(quota_key(client_id), secs).await?;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        ping(&self.conn).await
    }
}
