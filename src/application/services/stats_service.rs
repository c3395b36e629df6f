//! Best-effort global resolution counter.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{trace, warn};

use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Key of the global resolution counter in the limits keyspace.
pub const RESOLUTION_COUNTER: &str = "counter";

/// Counts successful resolutions.
///
/// Increments are fire-and-forget: they run on a detached task and a failure
/// is logged, never surfaced to the request that triggered it.
#[derive(Clone)]
pub struct StatsCounter {
    repository: Arc<dyn StatsRepository>,
}

impl StatsCounter {
    pub fn new(repository: Arc<dyn StatsRepository>) -> Self {
        Self { repository }
    }

    /// Schedules an increment of the resolution counter.
    ///
    /// The returned handle may be dropped; it exists so callers (and tests)
    /// can wait for the increment when they care.
    pub fn record_resolution(&self) -> JoinHandle<()> {
        let repository = self.repository.clone();
        tokio::spawn(async move {
            match repository.increment(RESOLUTION_COUNTER).await {
                Ok(total) => trace!(total, "Resolution counted"),
                Err(e) => warn!(error = ?e, "Failed to increment resolution counter"),
            }
        })
    }

    /// Reads the current resolution count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    pub async fn resolutions(&self) -> Result<i64, AppError> {
        self.repository.read(RESOLUTION_COUNTER).await
    }
}
