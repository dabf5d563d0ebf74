//! Error types for healthline

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures a source can run into while gathering facts.
///
/// None of these escape a source task: each one is turned into a header,
/// a note, or both.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("{provider} unavailable: {reason}")]
    ProviderUnavailable {
        provider: &'static str,
        reason: String,
    },

    #[error("Failed to read {name}: {reason}")]
    ItemRead { name: String, reason: String },

    #[error("No readings matched a known sensor pattern")]
    NoFactsFound,

    #[error("Nothing configured to monitor")]
    Misconfigured,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl ProbeError {
    pub fn item_read(name: impl Into<String>, reason: impl ToString) -> Self {
        ProbeError::ItemRead {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cpu_temp.warn ({warn}) must not exceed cpu_temp.crit ({crit})")]
    Thresholds { warn: i64, crit: i64 },

    #[error("Source {0} listed more than once in show_order")]
    DuplicateSource(String),

    #[error("Invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },
}
