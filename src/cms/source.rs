//! The content source seam

use async_trait::async_trait;
use serde_json::Value;

use super::{CmsError, Query};

/// Query primitives every content backend provides
///
/// Implementations return raw JSON objects; typing happens in the content
/// layer. An empty result set is reported as [`CmsError::NotFound`], matching
/// the objects API.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Find every object matching the query
    async fn find(&self, query: &Query) -> Result<Vec<Value>, CmsError>;

    /// Find the first object matching the query
    async fn find_one(&self, query: &Query) -> Result<Value, CmsError> {
        let query = query.clone().limit(1);
        self.find(&query)
            .await?
            .into_iter()
            .next()
            .ok_or(CmsError::NotFound)
    }

    /// Short name used in logs
    fn name(&self) -> &'static str;
}
