//! Per-client request quota over a fixed window.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::domain::entities::QuotaGrant;
use crate::domain::repositories::QuotaRepository;
use crate::error::AppError;

/// Rounds of the check protocol before giving up on a counter that keeps
/// expiring underneath us.
const MAX_ROUNDS: usize = 3;

/// Enforces a per-client quota using the store's atomic counters.
///
/// # Protocol
///
/// 1. If the client has no counter, create it with the full quota and the
///    window as its TTL (`SET NX EX`), then charge the request.
/// 2. Otherwise read the counter and its TTL. A counter at or below zero
///    rejects the request with [`AppError::QuotaExceeded`] without touching
///    the counter.
/// 3. Charge the request with an atomic decrement. If concurrent requests
///    drove the counter below zero, the decrement is undone and the request
///    is rejected, so the number of granted requests in a window never
///    exceeds the quota.
///
/// The reset time is the TTL observed at read time. The window is fixed when
/// the counter is created and is never extended.
pub struct RateLimiter {
    repository: Arc<dyn QuotaRepository>,
    quota: i64,
    window: Duration,
}

impl RateLimiter {
    pub fn new(repository: Arc<dyn QuotaRepository>, quota: u32, window: Duration) -> Self {
        Self {
            repository,
            quota: i64::from(quota),
            window,
        }
    }

    /// Charges one request to `client_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::QuotaExceeded`] when the client has no quota left.
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    #[instrument(skip(self), level = "debug")]
    pub async fn acquire(&self, client_id: &str) -> Result<QuotaGrant, AppError> {
        for _ in 0..MAX_ROUNDS {
            if self
                .repository
                .init_if_absent(client_id, self.quota, self.window)
                .await?
            {
                debug!(client_id = %client_id, quota = self.quota, "Opened quota window");
                match self.charge(client_id, self.window).await? {
                    Some(grant) => return Ok(grant),
                    None => continue,
                }
            }

            let Some(snapshot) = self.repository.read(client_id).await? else {
                continue;
            };

            let reset = match snapshot.ttl {
                Some(ttl) => ttl,
                None => {
                    warn!(client_id = %client_id, "Quota counter without expiry, re-applying window");
                    self.repository.expire(client_id, self.window).await?;
                    self.window
                }
            };

            if snapshot.remaining <= 0 {
                debug!(client_id = %client_id, reset_secs = reset.as_secs(), "Quota exhausted");
                return Err(AppError::QuotaExceeded {
                    reset_seconds: reset.as_secs(),
                });
            }

            if let Some(grant) = self.charge(client_id, reset).await? {
                return Ok(grant);
            }
        }

        Err(AppError::store(format!(
            "quota counter for {client_id} expired repeatedly during check"
        )))
    }

    /// Decrements the counter. `Ok(None)` means the counter vanished and the
    /// protocol must restart.
    async fn charge(
        &self,
        client_id: &str,
        reset: Duration,
    ) -> Result<Option<QuotaGrant>, AppError> {
        let Some(remaining) = self.repository.decrement(client_id).await? else {
            return Ok(None);
        };

        if remaining < 0 {
            // Lost the race for the last unit; give it back.
            self.repository.increment(client_id).await?;
            debug!(client_id = %client_id, "Quota exhausted by concurrent requests");
            return Err(AppError::QuotaExceeded {
                reset_seconds: reset.as_secs(),
            });
        }

        Ok(Some(QuotaGrant {
            remaining,
            reset_seconds: reset.as_secs(),
        }))
    }

    /// Checks that the limits keyspace is reachable.
    pub async fn health_check(&self) -> bool {
        self.repository.health_check().await
    }
}
