//! Per-client quota state.

use std::time::Duration;

/// Raw counter state as read from the limits keyspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSnapshot {
    /// Requests left in the window.
    pub remaining: i64,
    /// Time until the window resets. `None` when the key carries no expiry.
    pub ttl: Option<Duration>,
}

/// Outcome of a granted quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaGrant {
    /// Requests left after this one.
    pub remaining: i64,
    pub reset_seconds: u64,
}

impl QuotaGrant {
    /// Whole minutes until reset, rounded down.
    pub fn reset_minutes(&self) -> u64 {
        self.reset_seconds / 60
    }
}
