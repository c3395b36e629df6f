//! In-process key-value store with per-key expiry.
//!
//! Mirrors the Redis commands the service relies on (`SET [NX] EX`, `GET`,
//! `EXISTS`, `PTTL`, `INCRBY`, `EXPIRE`) closely enough to run the whole
//! service without Redis. Used for local development (`STORE_BACKEND=memory`)
//! and throughout the test suite.
//!
//! Expiry is measured with [`tokio::time::Instant`], so tests can drive it
//! with `tokio::time::pause()` and `advance()`. Expired keys are dropped on
//! access, and swept from the whole keyspace whenever a write finds the map
//! has grown past its purge mark.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::entities::QuotaSnapshot;
use crate::domain::repositories::{MappingRepository, QuotaRepository, StatsRepository};
use crate::error::AppError;
use crate::infrastructure::keys::{code_key, quota_key, stats_key};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Map size at which writes first sweep expired keys.
const MIN_PURGE_MARK: usize = 1024;

/// Thread-safe in-memory store. Each instance is one keyspace.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    /// Only read or written while `entries` is locked.
    purge_mark: AtomicUsize,
    min_purge_mark: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_purge_mark(MIN_PURGE_MARK)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        debug!("Using in-memory store");
        Self::default()
    }

    fn with_purge_mark(min_purge_mark: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            purge_mark: AtomicUsize::new(min_purge_mark),
            min_purge_mark,
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|e| e.is_live(now)).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::store("memory store lock poisoned"))
    }

    /// Returns the live entry under `key`, dropping it if expired.
    fn live<'a>(
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
        now: Instant,
    ) -> Option<&'a mut Entry> {
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }

    /// Sweeps expired keys once the map reaches the purge mark, then moves
    /// the mark to twice the surviving size so sweeps stay amortized.
    fn purge_if_due(&self, entries: &mut HashMap<String, Entry>, now: Instant) {
        if entries.len() < self.purge_mark.load(Ordering::Relaxed) {
            return;
        }

        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        debug!(purged = before - entries.len(), kept = entries.len(), "Swept expired keys");

        let next = (entries.len() * 2).max(self.min_purge_mark);
        self.purge_mark.store(next, Ordering::Relaxed);
    }

    fn get_value(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut entries = self.lock()?;
        Ok(Self::live(&mut entries, key, Instant::now()).map(|e| e.value.clone()))
    }

    fn set(
        &self,
        key: String,
        value: String,
        ttl: Option<Duration>,
        only_if_absent: bool,
    ) -> Result<bool, AppError> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        if only_if_absent && Self::live(&mut entries, &key, now).is_some() {
            return Ok(false);
        }

        self.purge_if_due(&mut entries, now);
        entries.insert(
            key,
            Entry {
                value,
                expires_at: ttl.map(|ttl| now + ttl),
            },
        );
        Ok(true)
    }

    fn pttl(&self, key: &str) -> Result<Option<Option<Duration>>, AppError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        Ok(Self::live(&mut entries, key, now)
            .map(|e| e.expires_at.map(|at| at.saturating_duration_since(now))))
    }

    /// `INCRBY`. With `create` unset an absent key stays absent.
    fn incr_by(&self, key: &str, delta: i64, create: bool) -> Result<Option<i64>, AppError> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        let Some(entry) = Self::live(&mut entries, key, now) else {
            if !create {
                return Ok(None);
            }
            entries.insert(
                key.to_string(),
                Entry {
                    value: delta.to_string(),
                    expires_at: None,
                },
            );
            return Ok(Some(delta));
        };

        let current: i64 = entry
            .value
            .parse()
            .map_err(|_| AppError::store(format!("value at {key} is not an integer")))?;
        let next = current + delta;
        entry.value = next.to_string();
        Ok(Some(next))
    }
}

#[async_trait]
impl MappingRepository for MemoryStore {
    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.get_value(&code_key(code))?.is_some())
    }

    async fn put(&self, code: &str, url: &str, ttl: Duration) -> Result<(), AppError> {
        self.set(code_key(code), url.to_string(), Some(ttl), false)?;
        Ok(())
    }

    async fn put_if_absent(
        &self,
        code: &str,
        url: &str,
        ttl: Duration,
    ) -> Result<bool, AppError> {
        self.set(code_key(code), url.to_string(), Some(ttl), true)
    }

    async fn get(&self, code: &str) -> Result<String, AppError> {
        self.get_value(&code_key(code))?
            .ok_or_else(|| AppError::NotFound {
                code: code.to_string(),
            })
    }

    async fn ttl(&self, code: &str) -> Result<Option<Duration>, AppError> {
        Ok(self.pttl(&code_key(code))?.flatten())
    }

    async fn health_check(&self) -> bool {
        self.entries.lock().is_ok()
    }
}

#[async_trait]
impl QuotaRepository for MemoryStore {
    async fn init_if_absent(
        &self,
        client_id: &str,
        quota: i64,
        window: Duration,
    ) -> Result<bool, AppError> {
        self.set(quota_key(client_id), quota.to_string(), Some(window), true)
    }

    async fn read(&self, client_id: &str) -> Result<Option<QuotaSnapshot>, AppError> {
        let key = quota_key(client_id);
        let now = Instant::now();
        let mut entries = self.lock()?;

        let Some(entry) = Self::live(&mut entries, &key, now) else {
            return Ok(None);
        };

        let remaining = entry
            .value
            .parse()
            .map_err(|_| AppError::store(format!("value at {key} is not an integer")))?;

        Ok(Some(QuotaSnapshot {
            remaining,
            ttl: entry.expires_at.map(|at| at.saturating_duration_since(now)),
        }))
    }

    async fn decrement(&self, client_id: &str) -> Result<Option<i64>, AppError> {
        self.incr_by(&quota_key(client_id), -1, false)
    }

    async fn increment(&self, client_id: &str) -> Result<Option<i64>, AppError> {
        self.incr_by(&quota_key(client_id), 1, false)
    }

    async fn expire(&self, client_id: &str, window: Duration) -> Result<(), AppError> {
        let key = quota_key(client_id);
        let now = Instant::now();
        let mut entries = self.lock()?;

        if let Some(entry) = Self::live(&mut entries, &key, now) {
            entry.expires_at = Some(now + window);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.entries.lock().is_ok()
    }
}

#[async_trait]
impl StatsRepository for MemoryStore {
    async fn increment(&self, name: &str) -> Result<i64, AppError> {
        let value = self.incr_by(&stats_key(name), 1, true)?;
        Ok(value.unwrap_or(1))
    }

    async fn read(&self, name: &str) -> Result<i64, AppError> {
        match self.get_value(&stats_key(name))? {
            Some(value) => value
                .parse()
                .map_err(|_| AppError::store(format!("counter {name} is not an integer"))),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn stored_keys(store: &MemoryStore) -> usize {
        store.entries.lock().unwrap().len()
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryStore::new();
        store.put("abc", "https://example.com/", HOUR).await.unwrap();

        assert!(MappingRepository::exists(&store, "abc").await.unwrap());
        assert_eq!(
            MappingRepository::get(&store, "abc").await.unwrap(),
            "https://example.com/"
        );
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            MappingRepository::get(&store, "nope").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_put_if_absent_refuses_live_key() {
        let store = MemoryStore::new();
        assert!(store.put_if_absent("x1", "https://a.com/", HOUR).await.unwrap());
        assert!(!store.put_if_absent("x1", "https://b.com/", HOUR).await.unwrap());
        assert_eq!(
            MappingRepository::get(&store, "x1").await.unwrap(),
            "https://a.com/"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_mapping_expires() {
        let store = MemoryStore::new();
        store.put("abc", "https://example.com/", HOUR).await.unwrap();

        tokio::time::advance(HOUR - Duration::from_secs(1)).await;
        assert!(MappingRepository::exists(&store, "abc").await.unwrap());
        assert_eq!(
            MappingRepository::ttl(&store, "abc").await.unwrap(),
            Some(Duration::from_secs(1))
        );

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!MappingRepository::exists(&store, "abc").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_if_absent_reuses_expired_code() {
        let store = MemoryStore::new();
        store.put("abc", "https://old.com/", HOUR).await.unwrap();
        tokio::time::advance(HOUR).await;

        assert!(store.put_if_absent("abc", "https://new.com/", HOUR).await.unwrap());
    }

    #[tokio::test]
    async fn test_quota_counter_lifecycle() {
        let store = MemoryStore::new();
        let window = Duration::from_secs(1800);

        assert!(store.init_if_absent("ip", 2, window).await.unwrap());
        assert!(!store.init_if_absent("ip", 2, window).await.unwrap());

        assert_eq!(QuotaRepository::decrement(&store, "ip").await.unwrap(), Some(1));
        assert_eq!(QuotaRepository::decrement(&store, "ip").await.unwrap(), Some(0));

        let snapshot = QuotaRepository::read(&store, "ip").await.unwrap().unwrap();
        assert_eq!(snapshot.remaining, 0);
        assert!(snapshot.ttl.is_some());
    }

    #[tokio::test]
    async fn test_adjusting_absent_counter_creates_nothing() {
        let store = MemoryStore::new();

        assert_eq!(QuotaRepository::decrement(&store, "ip").await.unwrap(), None);
        assert_eq!(QuotaRepository::increment(&store, "ip").await.unwrap(), None);
        assert!(QuotaRepository::read(&store, "ip").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats_counter_starts_at_zero() {
        let store = MemoryStore::new();

        assert_eq!(StatsRepository::read(&store, "counter").await.unwrap(), 0);
        assert_eq!(StatsRepository::increment(&store, "counter").await.unwrap(), 1);
        assert_eq!(StatsRepository::increment(&store, "counter").await.unwrap(), 2);
        assert_eq!(StatsRepository::read(&store, "counter").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_stats_and_quota_keys_are_separate() {
        let store = MemoryStore::new();
        store
            .init_if_absent("counter", 5, Duration::from_secs(60))
            .await
            .unwrap();
        StatsRepository::increment(&store, "counter").await.unwrap();

        let snapshot = QuotaRepository::read(&store, "counter").await.unwrap().unwrap();
        assert_eq!(snapshot.remaining, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_writes_sweep_expired_keys_never_read_again() {
        let store = MemoryStore::with_purge_mark(8);
        for i in 0..8 {
            store
                .put(&format!("gone{i}"), "https://example.com/", HOUR)
                .await
                .unwrap();
        }
        assert_eq!(stored_keys(&store), 8);

        tokio::time::advance(HOUR).await;
        store.put("fresh", "https://example.com/", HOUR).await.unwrap();

        assert_eq!(stored_keys(&store), 1);
        assert!(MappingRepository::exists(&store, "fresh").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_keeps_live_keys_and_raises_mark() {
        let store = MemoryStore::with_purge_mark(4);
        for i in 0..4 {
            store
                .put(&format!("live{i}"), "https://example.com/", HOUR)
                .await
                .unwrap();
        }
        store.put("live4", "https://example.com/", HOUR).await.unwrap();

        assert_eq!(stored_keys(&store), 5);
        assert_eq!(store.purge_mark.load(Ordering::Relaxed), 8);
        assert_eq!(store.len(), 5);
    }
}
