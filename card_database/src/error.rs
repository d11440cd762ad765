//! Error types for card_database
//!
//! Only infrastructure failures are errors. Data issues (unmatched records,
//! malformed ratings, unresolved booster cards) are logged and skipped by
//! the stage that meets them.

use std::path::PathBuf;

/// Fatal error aborting a database build
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP error status code without a Scryfall error body
    #[error("HTTP error {status} for {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    /// Scryfall answered with an error object
    #[error(transparent)]
    Api(#[from] mtg_common::ApiError),
    /// Failed to parse or serialize a JSON document
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// File I/O error
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An input file the build cannot do without
    #[error("Required file not found: {}", .0.display())]
    MissingFile(PathBuf),
    /// A primary client card whose title has no localized text
    #[error("No localization for title {title_id} of card {grpid}")]
    MissingLocalization { grpid: u32, title_id: u64 },
    /// The bulk-data catalog has no entry of the requested type
    #[error("Bulk data '{0}' not listed by Scryfall")]
    BulkDataUnavailable(String),
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        BuildError::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for card_database operations
pub type Result<T> = std::result::Result<T, BuildError>;
