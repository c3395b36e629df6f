//! Application layer services implementing business logic.
//!
//! Services orchestrate the repository traits from [`crate::domain`] and
//! expose the two operations handlers call.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - `shorten` and `resolve`
//! - [`services::rate_limiter::RateLimiter`] - per-client quota enforcement
//! - [`services::stats_service::StatsCounter`] - best-effort resolution counter

pub mod services;
