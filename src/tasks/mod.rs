//! Background Tasks Module
//!
//! Contains background tasks that run alongside the cache.
//!
//! # Tasks
//! - Reaper: removes expired cache entries once per TTL

mod reaper;

pub use reaper::{spawn_reaper, ReaperHandle};
