//! Error taxonomy for a pipeline run.
//!
//! Every variant here is fatal to the run that raised it: nothing is retried
//! and nothing is downgraded to a warning. The single tolerated partial-data
//! condition in the whole system is a per-cell numeric parse failure in
//! [`RowSet::normalize_numeric`](crate::RowSet::normalize_numeric), which
//! becomes [`Cell::Missing`](crate::Cell::Missing) instead of an error.

use thiserror::Error;

/// Fatal failure kinds for a single pipeline run.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EtlError {
    /// Network failure, timeout, or non-2xx response from the source.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// No table or record in the source matches the locator.
    #[error("no match in source document: {0}")]
    NotFound(String),

    /// The source body or an external input file is malformed.
    #[error("malformed source data: {0}")]
    Parse(String),

    /// A conversion referenced a code absent from the rate table.
    #[error("no conversion rate for code {0:?}")]
    MissingRate(String),

    /// A sink write (flat file or relational store) failed.
    #[error("sink write failed: {0}")]
    Load(String),
}

impl EtlError {
    /// Stable short name for the error kind, used in log output and by the
    /// process exit path.
    pub fn kind(&self) -> &'static str {
        match self {
            EtlError::Fetch(_) => "fetch_failure",
            EtlError::NotFound(_) => "not_found",
            EtlError::Parse(_) => "parse_failure",
            EtlError::MissingRate(_) => "missing_rate",
            EtlError::Load(_) => "load_failure",
        }
    }
}

impl From<reqwest::Error> for EtlError {
    fn from(err: reqwest::Error) -> Self {
        EtlError::Fetch(err.to_string())
    }
}

impl From<rusqlite::Error> for EtlError {
    fn from(err: rusqlite::Error) -> Self {
        EtlError::Load(err.to_string())
    }
}

impl From<csv::Error> for EtlError {
    fn from(err: csv::Error) -> Self {
        EtlError::Load(err.to_string())
    }
}

impl From<std::io::Error> for EtlError {
    fn from(err: std::io::Error) -> Self {
        EtlError::Load(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EtlError>;
