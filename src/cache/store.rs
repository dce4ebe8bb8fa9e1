//! Cache Store Module
//!
//! Unsynchronized key/entry map. Callers pass `now` and the TTL explicitly
//! so every expiry decision is reproducible.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheEntry, ExpiryPolicy};

// == Cache Store ==
/// Key to timestamped entry storage.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Inserts or wholesale replaces the entry for `key`, stamped with `now`.
    pub fn insert(&mut self, key: String, value: Vec<u8>, now: Instant) {
        self.entries.insert(key, CacheEntry::new(value, now));
    }

    // == Lookup ==
    /// Returns the stored payload for `key`.
    ///
    /// Under [`ExpiryPolicy::Relaxed`] any present entry is returned, stale
    /// or not. Under [`ExpiryPolicy::Strict`] an entry older than `ttl`
    /// reads as absent.
    pub fn lookup(
        &self,
        key: &str,
        now: Instant,
        ttl: Duration,
        policy: ExpiryPolicy,
    ) -> Option<&[u8]> {
        let entry = self.entries.get(key)?;
        if policy == ExpiryPolicy::Strict && entry.is_expired(now, ttl) {
            return None;
        }
        Some(entry.value.as_slice())
    }

    // == Expired Keys ==
    /// Snapshot of the keys whose entries have outlived `ttl` at `now`.
    pub fn expired_keys(&self, now: Instant, ttl: Duration) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl))
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Remove Expired ==
    /// Removes the given keys, skipping any whose entry is no longer
    /// expired at `now` (it was refreshed after the snapshot).
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired(&mut self, keys: &[String], now: Instant, ttl: Duration) -> usize {
        let mut removed = 0;
        for key in keys {
            let still_expired = self
                .entries
                .get(key)
                .is_some_and(|entry| entry.is_expired(now, ttl));
            if still_expired {
                self.entries.remove(key);
                removed += 1;
            }
        }
        removed
    }

    // == Contains Key ==
    /// Whether `key` is physically present, regardless of policy.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the entry for `key` without applying the policy.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
