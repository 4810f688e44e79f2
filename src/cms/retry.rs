//! Retry wrapper for content sources

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::{CmsError, ContentSource, Query};
use crate::config::CmsConfig;

/// Wraps a content source with retry on transient failures.
pub struct RetryingSource {
    inner: Arc<dyn ContentSource>,
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryingSource {
    /// Creates a retry wrapper with default settings.
    ///
    /// Default settings:
    /// - Max retries: 2
    /// - Initial delay: 200 ms
    /// - Max delay: 2 seconds
    pub fn new(inner: Arc<dyn ContentSource>) -> Self {
        Self {
            inner,
            max_retries: 2,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }

    /// Creates a retry wrapper tuned by configuration.
    pub fn from_config(inner: Arc<dyn ContentSource>, config: &CmsConfig) -> Self {
        Self::new(inner)
            .with_max_retries(config.retry_attempts)
            .with_initial_delay(Duration::from_millis(config.retry_delay_ms))
            .with_max_delay(Duration::from_millis(config.retry_max_delay_ms))
    }

    /// Sets the number of retries after the first attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial delay between retries.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries as usize)
    }

    fn should_retry(error: &CmsError) -> bool {
        error.is_transient()
    }

    fn log_retry(error: &CmsError, delay: Duration) {
        tracing::debug!("Retrying CMS request in {:?} after: {}", delay, error);
    }
}

#[async_trait]
impl ContentSource for RetryingSource {
    async fn find(&self, query: &Query) -> Result<Vec<Value>, CmsError> {
        let inner = &self.inner;
        (|| async { inner.find(query).await })
            .retry(self.backoff())
            .when(Self::should_retry)
            .notify(Self::log_retry)
            .await
    }

    async fn find_one(&self, query: &Query) -> Result<Value, CmsError> {
        let inner = &self.inner;
        (|| async { inner.find_one(query).await })
            .retry(self.backoff())
            .when(Self::should_retry)
            .notify(Self::log_retry)
            .await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
