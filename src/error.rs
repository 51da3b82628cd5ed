//! Error types shared by the store client and page loaders.

use thiserror::Error;

/// Failure talking to the content store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid store configuration: {0}")]
    Config(String),

    #[error("Failed to read table dump: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a page load that cannot degrade to an empty view
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Project '{0}' not found")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
