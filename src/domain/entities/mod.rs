//! Core domain entities.
//!
//! Plain data carried between the service and its callers:
//!
//! - [`ShortenRequest`] / [`ShortenResult`] - input and output of shortening
//! - [`QuotaSnapshot`] / [`QuotaGrant`] - per-client quota state

pub mod link;
pub mod quota;

pub use link::{ShortenRequest, ShortenResult, expiry_ttl};
pub use quota::{QuotaGrant, QuotaSnapshot};
