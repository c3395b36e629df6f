//! # shortlink
//!
//! A URL shortening service built with Axum on top of a TTL-capable
//! key-value store (Redis), with a per-client request quota.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities and repository traits
//! - **Application Layer** ([`application`]) - Shortening, resolution and quota logic
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory store adapters
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Random base-62 short codes or caller-chosen aliases
//! - Per-mapping expiry delegated to the store's key TTL
//! - Per-client quota over a fixed window, enforced with atomic counters
//! - Rejection of URLs pointing back at the service itself
//! - Best-effort global resolution counter
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! export REDIS_LIMITS_URL="redis://localhost:6379/1"
//! export DOMAIN="sho.rt"
//!
//! cargo run
//!
//! curl -X POST localhost:3000/api/v1/shorten \
//!      -H 'content-type: application/json' \
//!      -d '{"url": "example.com/some/long/path"}'
//! ```
//!
//! Use `STORE_BACKEND=memory` to run without Redis.
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

