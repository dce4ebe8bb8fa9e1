//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored payload stamped with its insertion time.
///
/// Entries are never mutated; re-inserting a key replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Opaque payload, usually a serialized JSON document
    pub value: Vec<u8>,
    /// When the entry was inserted
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with `created_at`.
    pub fn new(value: Vec<u8>, created_at: Instant) -> Self {
        Self { value, created_at }
    }

    // == Age ==
    /// Time elapsed between insertion and `now`. Zero if `now` is earlier.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl` at `now`.
    ///
    /// Boundary condition: an entry whose age equals the TTL exactly is
    /// still fresh; it expires once its age is strictly greater.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) > ttl
    }
}
