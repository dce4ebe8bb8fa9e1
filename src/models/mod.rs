//! Response models for the proxy API
//!
//! Upstream documents are passed through as opaque JSON; only the proxy's
//! own endpoints have typed bodies.

pub mod responses;

pub use responses::{HealthResponse, StatsResponse};
