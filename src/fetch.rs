//! Fetching published report pages.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Why a report page could not be read.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure or non-2xx status from [`HttpFetcher`].
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Failure reported by a [`ReportFetcher`] that does not go through
    /// `reqwest`, such as a cache or an in-memory page store.
    #[error("{0}")]
    Other(String),
}

/// Something that can retrieve a report page as text.
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

/// [`ReportFetcher`] backed by a shared `reqwest` client.
///
/// Non-2xx responses are errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("simcheck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ReportFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url, "fetching report page");
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_url_is_an_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();
        let err = fetcher.fetch_page("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }
}
