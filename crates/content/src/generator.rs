//! Content generator trait and test double

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{ContentError, Result};
use crate::request::{GeneratedContent, GenerationRequest};

/// AI text service that turns a request into article text
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Whether the backend has the credentials it needs
    fn is_configured(&self) -> bool {
        true
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent>;
}

// ==================== Mock Implementation ====================

/// Generator that returns canned content or a fixed error
pub struct MockContentGenerator {
    failure: Option<ContentError>,
    configured: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockContentGenerator {
    /// Generator that always succeeds
    pub fn succeeding() -> Self {
        Self {
            failure: None,
            configured: true,
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Generator that always fails with `error`
    pub fn failing(error: ContentError) -> Self {
        Self {
            failure: Some(error),
            ..Self::succeeding()
        }
    }

    /// Generator that reports missing credentials
    pub fn unconfigured() -> Self {
        Self {
            failure: Some(ContentError::NotConfigured("generation")),
            configured: false,
            ..Self::succeeding()
        }
    }

    /// Sleep for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ContentGenerator for MockContentGenerator {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        Ok(GeneratedContent {
            title: format!("Generated: {}", request.fallback_title()),
            excerpt: request.fallback_excerpt(),
            body_markdown: "## Generated\n\nMock article body.".to_string(),
            tags: request.fallback_tags(),
            model: "mock".to_string(),
            prompt_version: "test".to_string(),
        })
    }
}
