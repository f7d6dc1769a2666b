//! Downstream cache invalidation after a publish

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{ContentError, Result};

/// Paths to invalidate for a newly published article
///
/// The home and news index always; the stock page when the article covers a ticker.
pub fn invalidation_paths(symbol: Option<&str>) -> Vec<String> {
    let mut paths = vec!["/".to_string(), "/news".to_string()];
    if let Some(symbol) = symbol {
        paths.push(format!("/stocks/{}", symbol.to_lowercase()));
    }
    paths
}

#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, paths: &[String]) -> Result<()>;
}

/// Invalidator used when no webhook is configured
#[derive(Debug, Default)]
pub struct NoopInvalidator;

#[async_trait]
impl CacheInvalidator for NoopInvalidator {
    async fn invalidate(&self, paths: &[String]) -> Result<()> {
        debug!(?paths, "No cache webhook configured, skipping invalidation");
        Ok(())
    }
}

/// Invalidator that records every call
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    calls: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidator that records and then fails every call
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingInvalidator {
    async fn invalidate(&self, paths: &[String]) -> Result<()> {
        self.calls.lock().push(paths.to_vec());
        if self.fail {
            Err(ContentError::Status {
                status: 503,
                body: "revalidate unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(feature = "client")]
pub use http::HttpRevalidator;

#[cfg(feature = "client")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::Client;
    use serde::Serialize;
    use tracing::info;

    use super::CacheInvalidator;
    use crate::error::{ContentError, Result};

    #[derive(Serialize)]
    struct RevalidateBody<'a> {
        paths: &'a [String],
    }

    /// POSTs `{"paths": [...]}` to a revalidate webhook
    pub struct HttpRevalidator {
        client: Client,
        url: String,
        token: Option<String>,
    }

    impl HttpRevalidator {
        /// Build from config; `None` when no webhook URL is set
        pub fn from_config(config: &config::CacheConfig) -> Result<Option<Self>> {
            let Some(url) = config::resolved_secret(config.revalidate_url.as_deref()) else {
                return Ok(None);
            };

            let client = Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .map_err(|e| ContentError::Connection(e.to_string()))?;

            Ok(Some(Self {
                client,
                url: url.to_string(),
                token: config::resolved_secret(config.revalidate_token.as_deref()).map(str::to_string),
            }))
        }
    }

    #[async_trait]
    impl CacheInvalidator for HttpRevalidator {
        async fn invalidate(&self, paths: &[String]) -> Result<()> {
            let mut request = self.client.post(&self.url).json(&RevalidateBody { paths });
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| ContentError::Connection(e.to_string()))?;
            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(ContentError::Status { status, body });
            }

            info!(?paths, "Invalidated cached paths");
            Ok(())
        }
    }
}
