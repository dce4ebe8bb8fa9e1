//! Cache Module
//!
//! Provides an in-memory key/value cache governed by a single TTL, with
//! expired entries reclaimed in the background.

mod entry;
mod policy;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use policy::ExpiryPolicy;
pub use shared::{Cache, WeakCache};
pub use stats::{CacheStats, StatsRecorder};
pub use store::CacheStore;
