use crate::config::ServerConfig;
use crate::error::ServerResult;
use simcheck::{HttpFetcher, MossCommand, ReportFetcher, Scorer};
use std::sync::Arc;

/// Shared application state
///
/// Immutable after startup; requests never write to it.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Runs the scoring tool against a staged batch
    pub scorer: Arc<dyn Scorer>,

    /// Fetches result and comparison pages
    pub fetcher: Arc<dyn ReportFetcher>,
}

impl ServerState {
    /// Create state backed by the real scoring tool and an HTTP client
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let scorer = Arc::new(MossCommand::new(&config.scorer));
        let fetcher = HttpFetcher::new(config.fetch_timeout())
            .map_err(|e| crate::ServerError::Internal(e.to_string()))?;

        Ok(Self::with_backends(config, scorer, Arc::new(fetcher)))
    }

    /// Create state with caller-supplied scorer and fetcher
    pub fn with_backends(
        config: ServerConfig,
        scorer: Arc<dyn Scorer>,
        fetcher: Arc<dyn ReportFetcher>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            scorer,
            fetcher,
        }
    }
}
