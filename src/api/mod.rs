//! API Module
//!
//! HTTP handlers and routing for the read-through proxy.
//!
//! # Endpoints
//! - `GET /api/*path` - Fetch an upstream document through the cache
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
