//! Shared Cache Handle
//!
//! Thread-safe, cloneable front for [`CacheStore`]. Readers share a read
//! lock; `put` and the delete phase of reclamation take the write lock.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore, ExpiryPolicy, StatsRecorder};
use crate::config::TtlSettings;
use crate::error::ConfigError;

/// State behind every clone of a [`Cache`]. `ttl` and `policy` are fixed
/// at construction and read without taking the lock.
#[derive(Debug)]
struct Shared {
    store: RwLock<CacheStore>,
    stats: StatsRecorder,
    ttl: Duration,
    policy: ExpiryPolicy,
}

// == Cache ==
/// Time-bounded key/value cache shared across tasks.
///
/// Cloning is cheap; all clones see the same entries. Expired entries are
/// removed by [`Cache::reclaim_expired`], normally driven by
/// [`crate::tasks::spawn_reaper`].
#[derive(Debug, Clone)]
pub struct Cache {
    shared: Arc<Shared>,
}

/// Non-owning reference used by the reaper so it never keeps a cache alive.
#[derive(Debug, Clone)]
pub struct WeakCache {
    shared: Weak<Shared>,
}

impl WeakCache {
    /// Returns the cache if any strong handle is still alive.
    pub fn upgrade(&self) -> Option<Cache> {
        self.shared.upgrade().map(|shared| Cache { shared })
    }
}

impl Cache {
    // == Constructors ==
    /// Creates a cache with the relaxed expiry policy.
    ///
    /// # Errors
    /// `ConfigError::ZeroTtl` if `ttl` is zero.
    pub fn new(ttl: Duration) -> Result<Self, ConfigError> {
        Self::with_policy(ttl, ExpiryPolicy::Relaxed)
    }

    /// Creates a cache with an explicit expiry policy.
    pub fn with_policy(ttl: Duration, policy: ExpiryPolicy) -> Result<Self, ConfigError> {
        if ttl.is_zero() {
            return Err(ConfigError::ZeroTtl);
        }
        debug!(?ttl, %policy, "Creating cache");
        Ok(Self {
            shared: Arc::new(Shared {
                store: RwLock::new(CacheStore::new()),
                stats: StatsRecorder::default(),
                ttl,
                policy,
            }),
        })
    }

    /// Creates a cache from a user-facing unit and magnitude, e.g.
    /// `("second", 5)` or `("m", 2)`.
    ///
    /// # Errors
    /// Empty or unknown unit, non-positive magnitude, or overflow.
    pub fn from_unit(unit: &str, magnitude: i64) -> Result<Self, ConfigError> {
        let settings = TtlSettings::parse(unit, magnitude)?;
        Self::new(settings.ttl())
    }

    // == Put ==
    /// Inserts or replaces the value for `key`, stamped with the current time.
    pub async fn put(&self, key: impl Into<String>, value: Vec<u8>) {
        let key = key.into();
        let mut store = self.shared.store.write().await;
        store.insert(key, value, Instant::now());
    }

    // == Get ==
    /// Returns a copy of the value stored for `key`.
    ///
    /// Under the relaxed policy an expired entry stays readable until it
    /// is reclaimed.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let value = {
            let store = self.shared.store.read().await;
            store
                .lookup(key, Instant::now(), self.shared.ttl, self.shared.policy)
                .map(<[u8]>::to_vec)
        };
        match value {
            Some(_) => self.shared.stats.record_hit(),
            None => self.shared.stats.record_miss(),
        }
        value
    }

    // == Reclaim Expired ==
    /// Runs one reclamation pass and returns how many entries were removed.
    ///
    /// Expired keys are collected under the read lock; the write lock is
    /// only taken when there is something to delete, and each key is
    /// re-checked before removal.
    pub async fn reclaim_expired(&self) -> usize {
        let expired = {
            let store = self.shared.store.read().await;
            if store.is_empty() {
                return 0;
            }
            store.expired_keys(Instant::now(), self.shared.ttl)
        };

        if expired.is_empty() {
            return 0;
        }

        let removed = {
            let mut store = self.shared.store.write().await;
            store.remove_expired(&expired, Instant::now(), self.shared.ttl)
        };
        self.shared.stats.record_reclaimed(removed);
        removed
    }

    /// Whether `key` is physically stored, ignoring the expiry policy and
    /// without touching the hit/miss counters.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.shared.store.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.shared.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shared.store.read().await.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let total = self.len().await;
        self.shared.stats.snapshot(total)
    }

    pub fn ttl(&self) -> Duration {
        self.shared.ttl
    }

    pub fn policy(&self) -> ExpiryPolicy {
        self.shared.policy
    }

    /// Returns a weak reference that does not keep the cache alive.
    pub fn downgrade(&self) -> WeakCache {
        WeakCache {
            shared: Arc::downgrade(&self.shared),
        }
    }
}
