// src/error.rs
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodestatsError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("git {args} failed: {stderr}")]
    Git { args: String, stderr: String },

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("Invalid relative time '{0}'. Expected Xh, Xd, Xw, Xm or Xy")]
    InvalidDuration(String),

    #[error("No commits found from {0} onwards")]
    NoCommits(String),

    #[error("Extractor timed out after {0:?}")]
    ExtractorTimeout(Duration),

    #[error("Extractor failed: {0}")]
    ExtractorFailed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, CodestatsError>;

impl CodestatsError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// True for errors caused by bad user input (dates, durations, config).
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidDate(_) | Self::InvalidDuration(_) | Self::Config(_)
        )
    }
}

// Allow `?` on std::io::Error by converting to CodestatsError::Io with unknown path.
impl From<std::io::Error> for CodestatsError {
    fn from(source: std::io::Error) -> Self {
        CodestatsError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
