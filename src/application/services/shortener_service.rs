//! Shortening and resolution orchestration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::application::services::{RateLimiter, StatsCounter};
use crate::domain::entities::{ShortenRequest, ShortenResult, expiry_ttl};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, validate_custom_alias};
use crate::utils::url_validator::UrlValidator;

/// Tunables for [`ShortenerService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenerOptions {
    /// Public domain prefixed to codes in short URLs (`localhost:3000`).
    pub public_domain: String,
    /// Expiry applied when the request asks for none (or zero).
    pub default_expiry_hours: u64,
    /// Largest expiry a request may ask for.
    pub max_expiry_hours: u64,
    /// Random codes tried per request before reporting a collision.
    pub code_attempts: u32,
}

impl Default for ShortenerOptions {
    fn default() -> Self {
        Self {
            public_domain: "localhost:3000".to_string(),
            default_expiry_hours: 24,
            max_expiry_hours: 24 * 365,
            code_attempts: 1,
        }
    }
}

/// Creates and resolves short links.
///
/// Stateless apart from its collaborators: every piece of cross-request
/// state lives in the store behind the repositories, so a single instance is
/// shared by all request workers.
pub struct ShortenerService {
    mappings: Arc<dyn MappingRepository>,
    rate_limiter: RateLimiter,
    stats: StatsCounter,
    generator: Arc<dyn CodeGenerator>,
    validator: UrlValidator,
    options: ShortenerOptions,
}

impl ShortenerService {
    pub fn new(
        mappings: Arc<dyn MappingRepository>,
        rate_limiter: RateLimiter,
        stats: StatsCounter,
        generator: Arc<dyn CodeGenerator>,
        options: ShortenerOptions,
    ) -> Self {
        let validator = UrlValidator::new(&options.public_domain);
        Self {
            mappings,
            rate_limiter,
            stats,
            generator,
            validator,
            options,
        }
    }

    /// Shortens `request.original_url` on behalf of `client_id`.
    ///
    /// # Steps
    ///
    /// 1. Charge the client's quota
    /// 2. Validate and normalize the URL
    /// 3. Pick the custom alias or generate a code
    /// 4. Reject codes that already hold a live mapping
    /// 5. Store the mapping with the requested expiry
    ///
    /// # Errors
    ///
    /// - [`AppError::MissingClientId`] if `client_id` is absent
    /// - [`AppError::QuotaExceeded`] when the client's quota is spent
    /// - [`AppError::InvalidUrl`] / [`AppError::DomainRejected`] from validation
    /// - [`AppError::InvalidAlias`] / [`AppError::InvalidExpiry`] for bad options
    /// - [`AppError::AliasInUse`] if the code is taken
    /// - [`AppError::StoreUnavailable`] on store errors
    #[instrument(skip(self, request), fields(url = %request.original_url))]
    pub async fn shorten(
        &self,
        client_id: Option<&str>,
        request: ShortenRequest,
    ) -> Result<ShortenResult, AppError> {
        let client_id = client_id
            .filter(|id| !id.is_empty())
            .ok_or(AppError::MissingClientId)?;

        let grant = self.rate_limiter.acquire(client_id).await?;

        let url = self.validator.validate(&request.original_url)?;
        let expiry_hours = self.expiry_hours(request.expiry_hours)?;
        let ttl = expiry_ttl(expiry_hours);

        let short_code = match request.alias() {
            Some(alias) => {
                validate_custom_alias(alias)?;
                self.store_alias(alias, &url, ttl).await?
            }
            None => self.store_generated(&url, ttl).await?,
        };

        info!(code = %short_code, client_id = %client_id, expiry_hours, "Short link created");

        Ok(ShortenResult {
            original_url: url,
            short_code,
            expiry_hours,
            rate_remaining: grant.remaining,
            rate_reset_minutes: grant.reset_minutes(),
        })
    }

    /// Returns the URL stored under `code` and counts the resolution.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or expired.
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    #[instrument(skip(self))]
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let url = self.mappings.get(code).await?;

        // Detached; the handle is intentionally dropped.
        drop(self.stats.record_resolution());

        debug!(code = %code, "Short link resolved");
        Ok(url)
    }

    /// Builds the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.options.public_domain.trim_end_matches('/'), code)
    }

    /// Reachability of the codes and limits keyspaces.
    pub async fn health(&self) -> (bool, bool) {
        tokio::join!(
            self.mappings.health_check(),
            self.rate_limiter.health_check()
        )
    }

    fn expiry_hours(&self, requested: Option<u64>) -> Result<u64, AppError> {
        match requested {
            None | Some(0) => Ok(self.options.default_expiry_hours),
            Some(hours) if hours > self.options.max_expiry_hours => {
                Err(AppError::InvalidExpiry(format!(
                    "must be at most {} hours, got {hours}",
                    self.options.max_expiry_hours
                )))
            }
            Some(hours) => Ok(hours),
        }
    }

    async fn store_alias(&self, alias: &str, url: &str, ttl: Duration) -> Result<String, AppError> {
        if self.mappings.exists(alias).await?
            || !self.mappings.put_if_absent(alias, url, ttl).await?
        {
            debug!(code = %alias, "Custom alias already taken");
            return Err(AppError::AliasInUse {
                code: alias.to_string(),
            });
        }

        Ok(alias.to_string())
    }

    async fn store_generated(&self, url: &str, ttl: Duration) -> Result<String, AppError> {
        let attempts = self.options.code_attempts.max(1);
        let mut last = String::new();

        for attempt in 1..=attempts {
            let code = self.generator.generate();

            if !self.mappings.exists(&code).await?
                && self.mappings.put_if_absent(&code, url, ttl).await?
            {
                return Ok(code);
            }

            debug!(code = %code, attempt, attempts, "Generated code collided");
            last = code;
        }

        Err(AppError::AliasInUse { code: last })
    }
}
