//! Redis implementation of [`StatsRepository`].

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

use crate::domain::repositories::StatsRepository;
use crate::error::AppError;
use crate::infrastructure::keys::stats_key;

/// Global counters as persistent (non-expiring) integer keys.
#[derive(Clone)]
pub struct RedisStatsRepository {
    conn: ConnectionManager,
}

impl RedisStatsRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl StatsRepository for RedisStatsRepository {
    async fn increment(&self, name: &str) -> Result<i64, AppError> {
        let mut conn = self.conn.clone();
        Ok(conn.incr::<_, _, i64>(stats_key(name), 1).await?)
    }

    async fn read(&self, name: &str) -> Result<i64, AppError> {
        let mut conn = self.conn.clone();
        let value: Option<i64> = conn.get(stats_key(name)).await?;
        Ok(value.unwrap_or(0))
    }
}
