//! Error types and error handling for the docqa service.
//!
//! This module defines the error types used throughout the
//! application. HTTP status mapping lives in the `http` adapter
//! module.

use thiserror::Error;

/// Result type alias for docqa operations
pub type Result<T> = std::result::Result<T, DocQaError>;

/// Main error type for the docqa service
#[derive(Error, Debug)]
pub enum DocQaError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Vector index not initialized for document: {0}")]
    IndexNotInitialized(String),

    #[error("Embedding dimension mismatch: index holds {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("No extractable text found in document")]
    EmptyDocument,

    #[error("Rate limit exceeded. Maximum {max_requests} requests per {window_secs} seconds")]
    RateLimited {
        max_requests: usize,
        window_secs: u64,
    },

    #[error("Upstream request timed out: {0}")]
    UpstreamTimeout(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Tokenization failed: {0}")]
    Tokenizer(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl DocQaError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocQaError::DocumentNotFound(_) | DocQaError::IndexNotInitialized(_)
        )
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            DocQaError::InvalidRequest(_)
                | DocQaError::ExtractionFailed(_)
                | DocQaError::EmptyDocument
        )
    }

    /// Check if this error originated in an upstream collaborator
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DocQaError::Upstream(_) | DocQaError::UpstreamTimeout(_)
        )
    }
}
