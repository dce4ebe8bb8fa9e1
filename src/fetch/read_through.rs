//! Read-Through Fetching
//!
//! Check the cache by key, and only go upstream on a miss.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::Cache;
use crate::error::{FetchError, Result};
use crate::fetch::Upstream;

/// Returns the value cached under `key`, or loads, decodes and caches it.
///
/// On a hit the cached bytes are decoded into `T`. On a miss `load` is
/// awaited, its bytes are decoded into `T`, and the decoded value is
/// re-serialized and stored under `key`, so the cache holds only the
/// fields `T` keeps.
///
/// # Errors
/// Any load or decode failure is returned and the cache is left as it was.
pub async fn fetch_or_load<T, F, Fut>(cache: &Cache, key: &str, load: F) -> Result<T>
where
    T: DeserializeOwned + Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<u8>>>,
{
    if let Some(cached) = cache.get(key).await {
        debug!(key, "Cache hit");
        return Ok(serde_json::from_slice(&cached)?);
    }

    debug!(key, "Cache miss, loading");
    let raw = load().await?;
    let value: T = serde_json::from_slice(&raw)?;
    let encoded = serde_json::to_vec(&value)?;
    cache.put(key, encoded).await;

    Ok(value)
}

// == Read Through ==
/// A cache paired with the upstream it fronts.
#[derive(Clone)]
pub struct ReadThrough {
    cache: Cache,
    upstream: Arc<dyn Upstream>,
    base_url: String,
}

impl ReadThrough {
    /// `base_url` is joined with request paths by [`ReadThrough::url_for`].
    pub fn new(cache: Cache, upstream: Arc<dyn Upstream>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            cache,
            upstream,
            base_url,
        }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the fully-qualified upstream URL used as the cache key.
    ///
    /// # Errors
    /// `InvalidRequest` for an empty path or one with `..` segments.
    pub fn url_for(&self, path: &str, query: Option<&str>) -> Result<String> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Err(FetchError::InvalidRequest("Path cannot be empty".to_string()));
        }
        if path.split('/').any(|segment| segment == "..") {
            return Err(FetchError::InvalidRequest(format!(
                "Path may not contain '..': {}",
                path
            )));
        }

        let mut url = format!("{}/{}", self.base_url, path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        Ok(url)
    }

    /// Read-through fetch of `url`, decoded as `T`.
    pub async fn fetch<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned + Serialize,
    {
        fetch_or_load(&self.cache, url, || self.upstream.get_bytes(url)).await
    }
}
