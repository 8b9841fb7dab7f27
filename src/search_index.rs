//! External search-index collaborator.
//!
//! The engine may be constructed without a notifier, and a failing notifier
//! never fails a catalog operation; it is logged and dropped.

use async_trait::async_trait;
use url::Url;

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Tell the index that a dataset was created or changed.
    async fn index_dataset(&self, nbn: &str) -> Result<(), SearchIndexError>;
}

/// Notifier that POSTs the changed NBN to an HTTP search service.
pub struct HttpSearchIndex {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSearchIndex {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl SearchIndex for HttpSearchIndex {
    async fn index_dataset(&self, nbn: &str) -> Result<(), SearchIndexError> {
        let url = self
            .base_url
            .join("index")
            .map_err(|e| SearchIndexError::InvalidUrl(e.to_string()))?;

        self.client
            .post(url)
            .json(&serde_json::json!({ "nbn": nbn }))
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(nbn, "notified search index");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchIndexError {
    #[error("search index request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search index URL is invalid: {0}")]
    InvalidUrl(String),
}
