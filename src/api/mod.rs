pub mod http;
pub mod wire;

pub use http::HttpBackend;

use crate::model::{PageMetadata, Query, ResultPage, SuggestionSet};

/// Backend abstraction - the widget only depends on these contracts
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Find flagged documents below `query`, continuing after `offset` documents
    async fn find(&self, query: &Query, offset: usize) -> Result<ResultPage, ApiError>;

    /// Propose a few topics
    async fn suggest(&self) -> Result<SuggestionSet, ApiError>;

    /// Candidate topics starting with `prefix`
    async fn autocomplete(&self, prefix: &str) -> Result<Vec<String>, ApiError>;

    /// Title and description of one document
    async fn metadata(&self, page_id: &str) -> Result<PageMetadata, ApiError>;
}

/// Backend-related errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}
