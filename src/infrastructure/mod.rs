//! Infrastructure layer: key-value store adapters.
//!
//! Implements the repository traits from [`crate::domain::repositories`].
//!
//! # Modules
//!
//! - [`redis`] - Redis-backed repositories (production)
//! - [`memory`] - In-process TTL store with Redis-compatible semantics
//! - [`keys`] - Key layout shared by both backends

pub mod keys;
pub mod memory;
pub mod redis;

use std::sync::Arc;
use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::domain::repositories::{MappingRepository, QuotaRepository, StatsRepository};
use crate::error::AppError;
use memory::MemoryStore;

/// The repositories over both keyspaces.
///
/// Mappings live in the codes keyspace; quota counters and the stats
/// counter live in the limits keyspace.
#[derive(Clone)]
pub struct Stores {
    pub mappings: Arc<dyn MappingRepository>,
    pub quotas: Arc<dyn QuotaRepository>,
    pub stats: Arc<dyn StatsRepository>,
}

impl Stores {
    /// Two independent in-memory keyspaces.
    pub fn memory() -> Self {
        let codes = Arc::new(MemoryStore::new());
        let limits = Arc::new(MemoryStore::new());

        Self {
            mappings: codes,
            quotas: limits.clone(),
            stats: limits,
        }
    }

    /// Connects to Redis. When both URLs are equal a single connection
    /// serves both keyspaces.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if either connection fails.
    pub async fn redis(codes_url: &str, limits_url: &str) -> Result<Self, AppError> {
        let codes = redis::connect(codes_url).await?;
        let limits = if limits_url == codes_url {
            codes.clone()
        } else {
            redis::connect(limits_url).await?
        };

        Ok(Self {
            mappings: Arc::new(redis::RedisMappingRepository::new(codes)),
            quotas: Arc::new(redis::RedisQuotaRepository::new(limits.clone())),
            stats: Arc::new(redis::RedisStatsRepository::new(limits)),
        })
    }

    /// Builds the backend selected by `STORE_BACKEND`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if Redis is selected and
    /// unreachable.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        match config.store_backend {
            StoreBackend::Redis => {
                let stores = Self::redis(&config.redis_url, &config.redis_limits_url).await?;
                info!("Store backend: redis");
                Ok(stores)
            }
            StoreBackend::Memory => {
                info!("Store backend: memory (data is lost on restart)");
                Ok(Self::memory())
            }
        }
    }
}
