//! Business logic services for the application layer.

pub mod rate_limiter;
pub mod shortener_service;
pub mod stats_service;

pub use rate_limiter::RateLimiter;
pub use shortener_service::{ShortenerOptions, ShortenerService};
pub use stats_service::StatsCounter;
