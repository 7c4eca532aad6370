//! Error types for perfilar.

use std::path::PathBuf;

/// Result type alias for perfilar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in perfilar operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The path where the error occurred, if known.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Arrow error during data processing.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error during file operations.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Dataset has no columns, so profiling is undefined.
    #[error("Dataset has no columns")]
    EmptySchema,

    /// Dataset has no rows, so statistics are undefined.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Schema mismatch between batches.
    #[error("Schema mismatch: {message}")]
    SchemaMismatch {
        /// Description of the schema mismatch.
        message: String,
    },

    /// Profile list does not match the dataset's declared column count.
    #[error("Profile mismatch: dataset declares {expected} columns, got {actual} profiles")]
    ProfileMismatch {
        /// Column count declared by the dataset profile.
        expected: usize,
        /// Number of column profiles supplied.
        actual: usize,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },
}

impl Error {
    /// Create an I/O error with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create a schema mismatch error.
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io(io_err, "/path/to/file");
        assert!(err.to_string().contains("/path/to/file"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_empty_schema() {
        let err = Error::EmptySchema;
        assert!(err.to_string().contains("no columns"));
    }

    #[test]
    fn test_empty_dataset() {
        let err = Error::EmptyDataset;
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_schema_mismatch() {
        let err = Error::schema_mismatch("expected Int64, got Utf8");
        assert!(err.to_string().contains("expected Int64, got Utf8"));
    }

    #[test]
    fn test_profile_mismatch() {
        let err = Error::ProfileMismatch {
            expected: 3,
            actual: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_invalid_config() {
        let err = Error::invalid_config("min_missing_share must lie in [0, 1]");
        assert!(err.to_string().contains("min_missing_share"));
    }
}
