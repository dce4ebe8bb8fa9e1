//! Upstream Sources
//!
//! The slow remote side of a read-through fetch.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::error::{FetchError, Result};

/// Something that can produce the raw bytes behind a URL.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetches the body for `url`. Non-success responses are errors.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

// == HTTP Upstream ==
/// [`Upstream`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    #[instrument(skip(self))]
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Fetched upstream document");
        Ok(body.to_vec())
    }
}
