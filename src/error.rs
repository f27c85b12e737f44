//! Error types for card_pricer

use thiserror::Error;

/// Unified error type for pricing operations
#[derive(Debug, Error)]
pub enum PricerError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Query is missing fields required for the comp lookup
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Result alias for pricing operations
pub type Result<T> = std::result::Result<T, PricerError>;
