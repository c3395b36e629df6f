//! Domain layer: entities and storage contracts.
//!
//! - [`entities`] - request/result and quota data
//! - [`repositories`] - key-value store trait definitions
//!
//! The domain layer has no dependency on infrastructure or HTTP. All
//! cross-request state (mappings, quota counters, stats) lives behind the
//! repository traits, so request workers share no in-process mutable state.

pub mod entities;
pub mod repositories;
