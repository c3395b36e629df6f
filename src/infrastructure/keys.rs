//! Key layout shared by every store backend.
//!
//! Mappings live in the codes keyspace, quota counters and global stats in
//! the limits keyspace. Prefixes keep the two apart even when both
//! keyspaces are served by the same Redis database.

pub const CODE_PREFIX: &str = "url:";
pub const QUOTA_PREFIX: &str = "quota:";
pub const STATS_PREFIX: &str = "stats:";

pub fn code_key(code: &str) -> String {
    format!("{CODE_PREFIX}{code}")
}

pub fn quota_key(client_id: &str) -> String {
    format!("{QUOTA_PREFIX}{client_id}")
}

pub fn stats_key(name: &str) -> String {
    format!("{STATS_PREFIX}{name}")
}
