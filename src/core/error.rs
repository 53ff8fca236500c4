//! Error types and error handling for codevec.
//!
//! This module defines the error types used throughout the indexer.
//! Presentation (colors, exit codes) is handled by the CLI adapter.

use thiserror::Error;

/// Result type alias for codevec operations
pub type Result<T> = std::result::Result<T, CodevecError>;

/// Main error type for codevec
#[derive(Error, Debug)]
pub enum CodevecError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Embedding provider error: {0}")]
    ProviderError(String),

    #[error("Embedding provider rejected credentials: {0}")]
    ProviderUnauthorized(String),

    #[error("Embedding provider rate limited: {0}")]
    ProviderRateLimited(String),

    #[error("Vector store error: {0}")]
    StoreError(String),

    #[error("Embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Indexing run cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl CodevecError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a configuration problem
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CodevecError::ConfigError(_) | CodevecError::TomlError(_)
        )
    }

    /// Check if a caller-side retry could plausibly succeed.
    ///
    /// The pipeline itself never retries; this is a hint for callers
    /// that wrap it with their own policy.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CodevecError::ProviderRateLimited(_)
                | CodevecError::ProviderError(_)
                | CodevecError::StoreError(_)
        )
    }

    /// Check if this error must stop the whole run rather than a
    /// single document
    pub fn aborts_run(&self) -> bool {
        self.is_config_error() || matches!(self, CodevecError::Cancelled)
    }
}
