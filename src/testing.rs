//! Shared test fixtures

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::cms::{CmsError, ContentSource, MemorySource, Query};
use crate::config::SiteConfig;
use crate::content::ContentRepository;

pub const SAMPLE_CONTENT: &str = include_str!("../fixtures/content.json");

pub fn sample_source_owned() -> MemorySource {
    MemorySource::from_json(SAMPLE_CONTENT).expect("sample fixtures parse")
}

pub fn sample_source() -> Arc<dyn ContentSource> {
    Arc::new(sample_source_owned())
}

pub fn sample_repository() -> ContentRepository {
    ContentRepository::new(sample_source(), 3)
}

pub fn sample_config() -> SiteConfig {
    SiteConfig::default()
}

/// A source whose upstream is always down
pub struct FailingSource;

#[async_trait]
impl ContentSource for FailingSource {
    async fn find(&self, _query: &Query) -> Result<Vec<Value>, CmsError> {
        Err(CmsError::Upstream {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
