//! Scoring-tool configuration.
//!
//! [`ScorerConfig`] describes how the MOSS submission script is launched. It is
//! plain serde data so the server can embed it in its own layered config:
//!
//! ```toml
//! [scorer]
//! interpreter = "/usr/bin/perl"
//! script_path = "moss.pl"
//! match_threshold = 10
//! default_language = "python"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid scorer configuration: {0}")]
    Invalid(String),
}

/// How to run the scoring tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Interpreter that runs the submission script.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Path to the submission script. Relative paths resolve against the
    /// process working directory, not the staging directory.
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,

    /// Value passed with `-m`: how often a passage may appear before it is
    /// ignored as shared boilerplate.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: u32,

    /// Language used when a submission does not name one.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Parent directory for per-request staging directories. Defaults to the
    /// system temp dir.
    #[serde(default)]
    pub staging_root: Option<PathBuf>,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            script_path: default_script_path(),
            match_threshold: default_match_threshold(),
            default_language: default_language(),
            staging_root: None,
        }
    }
}

impl ScorerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interpreter.trim().is_empty() {
            return Err(ConfigError::Invalid("interpreter must not be empty".into()));
        }
        if self.script_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("script_path must not be empty".into()));
        }
        if self.match_threshold == 0 {
            return Err(ConfigError::Invalid("match_threshold must be >= 1".into()));
        }
        if self.default_language.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_language must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The language to submit with: the requested one, or the default when the
    /// request left it out or blank.
    pub fn language_or_default<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested.map(str::trim) {
            Some(lang) if !lang.is_empty() => lang,
            _ => &self.default_language,
        }
    }
}

fn default_interpreter() -> String {
    "/usr/bin/perl".to_string()
}

fn default_script_path() -> PathBuf {
    PathBuf::from("moss.pl")
}

fn default_match_threshold() -> u32 {
    10
}

fn default_language() -> String {
    "python".to_string()
}
