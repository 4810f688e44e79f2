//! Headless CMS access
//!
//! [`ContentSource`] is the seam between the site and its content backend.
//! [`CosmicClient`] talks to the Cosmic objects API, [`RetryingSource`] adds
//! bounded retries on transient failures, and [`MemorySource`] serves objects
//! from a fixtures file.

mod cosmic;
mod error;
mod memory;
mod query;
mod retry;
mod source;

use anyhow::Result;
use std::sync::Arc;

pub use cosmic::{CosmicClient, ObjectsResponse};
pub use error::CmsError;
pub use memory::MemorySource;
pub use query::{lookup, Query};
pub use retry::RetryingSource;
pub use source::ContentSource;

use crate::config::CmsConfig;

/// Build the configured remote source, wrapped with retries
pub fn connect(config: &CmsConfig) -> Result<Arc<dyn ContentSource>> {
    let client: Arc<dyn ContentSource> = Arc::new(CosmicClient::new(config)?);
    tracing::info!("Using CMS bucket {}", config.bucket_slug);
    Ok(Arc::new(RetryingSource::from_config(client, config)))
}
