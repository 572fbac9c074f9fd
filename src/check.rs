use report::{parse_comparison_title, parse_result_page, ComparisonRecord, PairwiseDetail};
use serde::Serialize;
use thiserror::Error;

use crate::fetch::{FetchError, ReportFetcher};
use crate::scorer::{ScoreError, Scorer};
use crate::staging::UploadBatch;

/// Every result URL the scoring service hands out starts with this.
pub const RESULT_URL_PREFIX: &str = "http://moss.stanford.edu/results/";

/// Result of a completed submission.
///
/// `results` is `None` when the tool succeeded but its report page could not
/// be fetched; the URL alone is still useful to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub url: String,
    pub results: Option<Vec<ComparisonRecord>>,
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("No files provided")]
    EmptyBatch,

    #[error(transparent)]
    Tool(#[from] ScoreError),

    #[error("scoring tool output does not end with a result URL")]
    UnexpectedOutput { output: String },
}

/// The result URL on the last non-blank line of `stdout`, if that line starts
/// with [`RESULT_URL_PREFIX`].
pub fn extract_result_url(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .filter(|line| line.starts_with(RESULT_URL_PREFIX))
}

/// Score a staged batch and scrape the resulting report.
///
/// Tool failures and unexpected output are errors. A report page that cannot
/// be fetched is not: the outcome then carries the URL with no results.
pub async fn check_batch(
    batch: &UploadBatch,
    language: &str,
    scorer: &dyn Scorer,
    fetcher: &dyn ReportFetcher,
) -> Result<CheckOutcome, CheckError> {
    if batch.is_empty() {
        return Err(CheckError::EmptyBatch);
    }

    let output = scorer.score(batch, language).await?;

    let Some(url) = extract_result_url(&output.stdout).map(str::to_string) else {
        return Err(CheckError::UnexpectedOutput {
            output: output.stdout,
        });
    };

    let results = match fetcher.fetch_page(&url).await {
        Ok(html) => {
            let records = parse_result_page(&html);
            tracing::info!(url = %url, pairs = records.len(), "parsed result page");
            Some(records)
        }
        Err(err) => {
            tracing::warn!(url = %url, error = %err, "failed to fetch result page");
            None
        }
    };

    Ok(CheckOutcome { url, results })
}

/// Fetch a pairwise comparison page and read the two file names off it.
pub async fn fetch_comparison(
    url: &str,
    fetcher: &dyn ReportFetcher,
) -> Result<PairwiseDetail, FetchError> {
    let html = fetcher.fetch_page(url).await?;
    Ok(parse_comparison_title(&html, url))
}
