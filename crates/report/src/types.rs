use serde::{Deserialize, Serialize};

/// One side of a matched pair: the file name as the report prints it and the
/// share of that file covered by the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMatch {
    pub name: String,
    pub percentage: u32,
}

/// A single row of the result summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub file1: FileMatch,
    pub file2: FileMatch,
    pub lines_matched: u64,
    /// Link to the pairwise comparison page, taken from the first column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_url: Option<String>,
}

/// A file named on a comparison page.
///
/// `code` is always empty: matched snippets are not extracted from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCode {
    pub name: String,
    pub code: Vec<String>,
}

impl FileCode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: Vec::new(),
        }
    }
}

/// The two files compared on a pairwise comparison page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseDetail {
    pub file1: FileCode,
    pub file2: FileCode,
    #[serde(rename = "sourceUrl")]
    pub source_url: String,
}
