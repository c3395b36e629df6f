//! HTTP middleware and request extractors.
//!
//! Provides client identification and observability.

pub mod client_id;
pub mod tracing;

pub use client_id::ClientId;
