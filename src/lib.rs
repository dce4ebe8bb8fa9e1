//! Pokecache - A read-through TTL cache
//!
//! An expiring key/value cache with a background reaper, and an HTTP proxy
//! that serves PokeAPI documents through it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::Cache;
pub use config::Config;
pub use tasks::spawn_reaper;
