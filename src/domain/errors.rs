//! Domain error types
//!
//! This module defines the error hierarchy for lastseen.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main lastseen error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// GBIF API errors
    #[error("GBIF error: {0}")]
    Gbif(#[from] GbifError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// The taxon does not exist in the local taxonomy
    #[error("Taxon not found: {0}")]
    TaxonNotFound(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// The operation was aborted by a shutdown signal
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// GBIF-specific errors
///
/// Errors that occur when talking to the occurrence search API. The client never
/// returns these to the crawl; they are carried inside a failed fetch outcome and
/// logged.
#[derive(Debug, Error)]
pub enum GbifError {
    /// Failed to connect to the API
    #[error("Failed to connect to GBIF: {0}")]
    ConnectionFailed(String),

    /// Request exceeded the configured timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Any status other than 200
    #[error("Unexpected status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The body could not be decoded as a search response
    #[error("Invalid response from GBIF: {0}")]
    InvalidResponse(String),
}

impl SyncError {
    /// Whether the error was caused by a shutdown signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SyncError::Cancelled(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
