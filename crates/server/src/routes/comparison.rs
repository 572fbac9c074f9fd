use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use simcheck::PairwiseDetail;
use std::sync::Arc;

/// Comparison request
#[derive(Debug, Deserialize)]
pub struct FetchComparisonRequest {
    /// Pairwise comparison page, as linked from a result row
    #[serde(default)]
    pub url: Option<String>,
}

/// Fetch a pairwise comparison page and return the two file names it compares.
///
/// `code` is always empty for both files. On a failed fetch the 500 response
/// keeps the same shape, with both names set to `"Error"`.
pub async fn fetch_comparison(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<FetchComparisonRequest>, JsonRejection>,
) -> ServerResult<Json<PairwiseDetail>> {
    let Json(request) = body?;
    let url = request
        .url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ServerError::BadRequest("No comparison URL provided".to_string()))?;

    match simcheck::fetch_comparison(&url, state.fetcher.as_ref()).await {
        Ok(detail) => Ok(Json(detail)),
        Err(err) => Err(ServerError::ComparisonFetch {
            message: err.to_string(),
            source_url: url,
        }),
    }
}
