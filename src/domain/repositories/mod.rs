//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the key-value store behind the service. Both
//! keyspaces are implemented by the Redis adapters in
//! `crate::infrastructure::redis` and by the in-process
//! `crate::infrastructure::memory::MemoryStore`.
//!
//! - [`MappingRepository`] - short code to URL mappings ("codes" keyspace)
//! - [`QuotaRepository`] - per-client quota counters ("limits" keyspace)
//! - [`StatsRepository`] - global counters ("limits" keyspace)
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod mapping_repository;
pub mod quota_repository;
pub mod stats_repository;

pub use mapping_repository::MappingRepository;
pub use quota_repository::QuotaRepository;
pub use stats_repository::StatsRepository;

#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
#[cfg(test)]
pub use quota_repository::MockQuotaRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
