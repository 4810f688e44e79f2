//! Errors raised by content sources

use thiserror::Error;

/// Failure of a CMS query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CmsError {
    /// The query matched nothing (HTTP 404 from the objects API)
    #[error("content not found")]
    NotFound,

    /// The CMS answered with a non-success status
    #[error("CMS returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Connection-level failure
    #[error("request to CMS failed: {0}")]
    Transport(String),

    #[error("request to CMS timed out")]
    Timeout,

    /// The response body did not have the expected shape
    #[error("unexpected CMS response: {0}")]
    Decode(String),

    /// Missing bucket or key
    #[error("CMS is not configured: {0}")]
    Config(String),
}

impl CmsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CmsError::NotFound)
    }

    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            CmsError::Transport(_) | CmsError::Timeout => true,
            CmsError::Upstream { status, .. } => *status == 429 || *status >= 500,
            CmsError::NotFound | CmsError::Decode(_) | CmsError::Config(_) => false,
        }
    }
}

impl From<reqwest::Error> for CmsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CmsError::Timeout
        } else if err.is_decode() {
            CmsError::Decode(err.to_string())
        } else {
            CmsError::Transport(err.to_string())
        }
    }
}
