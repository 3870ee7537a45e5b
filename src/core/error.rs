//! Error types and error handling for the kensaku engine.
//!
//! This module defines the error types used throughout the engine.
//! Missing tokens and documents during lookup are modeled as `Option`
//! values, not errors; only unusable input and storage failures
//! surface here.

use thiserror::Error;

/// Result type alias for kensaku operations
pub type Result<T> = std::result::Result<T, KensakuError>;

/// Main error type for the kensaku engine
#[derive(Error, Debug)]
pub enum KensakuError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Ingest of '{uri}' failed: {} token write(s) failed: [{}]", .failures.len(), .failures.join("; "))]
    IngestFailed { uri: String, failures: Vec<String> },

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

impl KensakuError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            KensakuError::InvalidQuery(_) | KensakuError::ConfigError(_)
        )
    }

    /// Check if this error left the index in a possibly inconsistent
    /// state for one document. Callers should re-ingest to repair.
    pub fn is_partial_write(&self) -> bool {
        matches!(self, KensakuError::IngestFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_query_is_bad_request() {
        let err = KensakuError::InvalidQuery("no searchable terms".to_string());
        assert!(err.is_bad_request());
        assert!(!err.is_partial_write());
    }

    #[test]
    fn test_storage_error_is_internal() {
        let err = KensakuError::StorageError("connection lost".to_string());
        assert!(!err.is_bad_request());
        assert!(!err.is_partial_write());
    }

    #[test]
    fn test_ingest_failed_lists_every_failure() {
        let err = KensakuError::IngestFailed {
            uri: "doc://a".to_string(),
            failures: vec![
                "'alpha': storage error".to_string(),
                "'gamma': storage error".to_string(),
            ],
        };
        assert!(err.is_partial_write());
        let msg = err.message();
        assert!(msg.contains("doc://a"));
        assert!(msg.contains("2 token write(s)"));
        assert!(msg.contains("'alpha'"));
        assert!(msg.contains("'gamma'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = KensakuError::from(io_err);
        assert!(!err.is_bad_request());
    }
}
