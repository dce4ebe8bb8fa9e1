//! Fetch Module
//!
//! Read-through access to a slow upstream, backed by the expiring cache.

mod read_through;
mod upstream;

pub use read_through::{fetch_or_load, ReadThrough};
pub use upstream::{HttpUpstream, Upstream};
