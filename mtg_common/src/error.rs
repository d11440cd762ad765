//! Error body returned by the Scryfall API

use serde::Deserialize;

/// Scryfall error object, sent with every non-2xx response
#[derive(Debug, Clone, Deserialize, thiserror::Error)]
#[error("Scryfall error {status} ({code}): {details}")]
pub struct ApiError {
    pub status: u16,
    pub code: String,
    pub details: String,
}
