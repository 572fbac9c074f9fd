//! Scrapers for the two report pages published by the MOSS similarity service.
//!
//! The service answers a submission with a result URL. That page holds a
//! summary table, one row per suspicious file pair; each row links to a
//! pairwise comparison page whose `<title>` names the two files.
//!
//! ## What we do
//!
//! - [`parse_result_page`] turns the summary table into [`ComparisonRecord`]s
//! - [`parse_comparison_title`] pulls the two file names out of a comparison page
//!
//! Both functions are pure: no I/O, no clock. Fetching the pages is the
//! caller's job. Malformed rows are skipped rather than reported, so neither
//! function can fail on HTML input.

mod comparison;
mod result_page;
mod types;

pub use crate::comparison::{parse_comparison_title, FALLBACK_FILE1, FALLBACK_FILE2};
pub use crate::result_page::parse_result_page;
pub use crate::types::{ComparisonRecord, FileCode, FileMatch, PairwiseDetail};
