// src/error.rs

use thiserror::Error;

pub type EvResult<T> = Result<T, EvError>;

/// Failures that escalate out of the pipeline. Record-level parse problems
/// never show up here, see [`crate::extract::RecordParseError`].
#[derive(Debug, Error)]
pub enum EvError {
    #[error("failed to fetch {url} for region `{region}`: {reason}")]
    Fetch {
        region: String,
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("no regions selected")]
    EmptySelection,

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("invalid value `{value}` for {key}: {reason}")]
    Config {
        key: String,
        value: String,
        reason: String,
    },

    #[error("nothing to export: {0}")]
    NothingToExport(&'static str),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EvError {
    /// HTTP status of a failed fetch, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            EvError::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}
