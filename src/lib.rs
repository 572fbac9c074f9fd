//! Umbrella crate for the simcheck source-similarity gateway.
//!
//! A submission is a batch of uploaded source files. This crate stages the
//! batch on disk, hands it to the MOSS submission script, picks the result
//! URL out of the script's output and scrapes the published report:
//!
//! ```text
//! UploadBatch ──► Scorer ──► result URL ──► ReportFetcher ──► report::parse_result_page
//! ```
//!
//! The scoring tool and the HTTP fetch sit behind the [`Scorer`] and
//! [`ReportFetcher`] traits so servers and tests can swap them out.

pub mod config;
pub mod fetch;
pub mod scorer;
pub mod staging;

mod check;

pub use crate::check::{
    check_batch, extract_result_url, fetch_comparison, CheckError, CheckOutcome,
    RESULT_URL_PREFIX,
};
pub use crate::config::{ConfigError, ScorerConfig};
pub use crate::fetch::{FetchError, HttpFetcher, ReportFetcher};
pub use crate::scorer::{MossCommand, ScoreError, Scorer, ToolOutput};
pub use crate::staging::{StagedFile, StagingError, UploadBatch};

pub use report::{
    parse_comparison_title, parse_result_page, ComparisonRecord, FileCode, FileMatch,
    PairwiseDetail,
};
