//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::Uri,
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::fetch::{HttpUpstream, ReadThrough, Upstream};
use crate::models::{HealthResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// Cloning shares the same cache and upstream client.
#[derive(Clone)]
pub struct AppState {
    /// Cache plus the upstream it fronts
    pub client: ReadThrough,
}

impl AppState {
    /// Creates a new AppState around an existing cache and upstream.
    pub fn new(cache: Cache, upstream: Arc<dyn Upstream>, base_url: impl Into<String>) -> Self {
        Self {
            client: ReadThrough::new(cache, upstream, base_url),
        }
    }

    /// Creates a new AppState from configuration, using an HTTP upstream.
    pub fn from_config(config: &Config, cache: Cache) -> Result<Self> {
        let upstream = HttpUpstream::new(std::time::Duration::from_secs(config.upstream_timeout))?;
        Ok(Self::new(
            cache,
            Arc::new(upstream),
            config.upstream_base_url.clone(),
        ))
    }

    pub fn cache(&self) -> &Cache {
        self.client.cache()
    }
}

/// Handler for GET /api/*path
///
/// Returns the upstream JSON document for `path`, served from the cache
/// when present.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>> {
    let url = state.client.url_for(&path, query.as_deref())?;
    let document: Value = state.client.fetch(&url).await?;
    info!("Served {}", url);
    Ok(Json(document))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache();
    let stats = cache.stats().await;

    Json(StatsResponse::new(
        &stats,
        cache.ttl().as_secs(),
        cache.policy(),
    ))
}

/// Handler for GET /health
///
/// Returns server health status.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Fallback for unknown routes, answered with 404.
pub async fn not_found_handler(uri: Uri) -> FetchError {
    FetchError::UnknownEndpoint(format!(
        "{}; use /api/<path>, /stats or /health",
        uri.path()
    ))
}
