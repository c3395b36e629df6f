//! Redis implementation of [`MappingRepository`].

use async_trait::async_trait;
use redis::{AsyncCommands, Value, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, warn};

use super::{expiry_secs, ping, pttl_to_duration};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::infrastructure::keys::code_key;

/// Mappings stored as plain string keys with a native Redis TTL.
#[derive(Clone)]
pub struct RedisMappingRepository {
    conn: ConnectionManager,
}

impl RedisMappingRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl MappingRepository for RedisMappingRepository {
    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        Ok(conn.exists::<_, bool>(code_key(code)).await?)
    }

    async fn put(&self, code: &str, url: &str, ttl: Duration) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(code_key(code), url, expiry_secs(ttl))
            .await
            .map_err(|e| {
                warn!(code = %code, error = %e, "Redis SET failed");
                AppError::from(e)
            })?;

        debug!(code = %code, ttl_secs = ttl.as_secs(), "Mapping stored");
        Ok(())
    }

    async fn put_if_absent(
        &self,
        code: &str,
        url: &str,
        ttl: Duration,
    ) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        let reply: Value = redis::cmd("SET")
            .arg(code_key(code))
            .arg(url)
            .arg("NX")
            .arg("EX")
            .arg(expiry_secs(ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(code = %code, error = %e, "Redis SET NX failed");
                AppError::from(e)
            })?;

        let stored = !matches!(reply, Value::Nil);
        debug!(code = %code, stored, "Conditional mapping write");
        Ok(stored)
    }

    async fn get(&self, code: &str) -> Result<String, AppError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(code_key(code))
            .await?
            .ok_or_else(|| AppError::NotFound {
                code: code.to_string(),
            })
    }

    async fn ttl(&self, code: &str) -> Result<Option<Duration>, AppError> {
        let mut conn = self.conn.clone();
        let pttl: i64 = conn.pttl(code_key(code)).await?;
        Ok(pttl_to_duration(pttl))
    }

    async fn health_check(&self) -> bool {
        ping(&self.conn).await
    }
}
