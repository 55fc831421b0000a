//! Error types for the tabular-insight engine.
//!
//! Every fallible operation in the crate returns [`InsightError`]. Only a small
//! part of what can go wrong while scanning a dataset is an error at all:
//! undecodable bytes, unparsable cells and unknown column names are absorbed
//! into the data model. What remains is surfaced here and is fatal to the
//! single scan or upload that hit it.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for the tabular-insight engine.
#[derive(Error, Debug)]
pub enum InsightError {
    /// The active dataset file could not be opened.
    #[error("Dataset '{}' could not be opened: {source}", path.display())]
    DatasetUnavailable {
        /// Path resolved from the active dataset handle
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the delimited-row reader while a scan was in progress.
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    /// An uploaded file could not be stored.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied argument was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, InsightError>`.
pub type Result<T> = std::result::Result<T, InsightError>;

impl InsightError {
    /// Creates a dataset-unavailable error for the given path.
    pub fn dataset_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DatasetUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an upload error.
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload(message.into())
    }
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<InsightError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            InsightError::Internal(inner) => InsightError::Internal(format!("{msg}: {inner}")),
            other => InsightError::Internal(format!("{msg}: {other}")),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                InsightError::Internal(inner) => InsightError::Internal(format!("{msg}: {inner}")),
                other => InsightError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_dataset_unavailable_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file");
        let err = InsightError::dataset_unavailable("data/missing.csv", source);

        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Dataset 'data/missing.csv' could not be opened: No such file"
        );
    }

    #[test]
    fn test_configuration_error() {
        let err = InsightError::configuration("numeric_threshold must be within [0, 1]");
        assert_eq!(
            err.to_string(),
            "Configuration error: numeric_threshold must be within [0, 1]"
        );
    }

    #[test]
    fn test_serde_error_conversion() {
        let err: InsightError = serde_json::from_str::<Vec<u32>>("{").unwrap_err().into();
        assert!(matches!(err, InsightError::Serialization(_)));
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<()> {
            Err(InsightError::upload("disk full"))
        }

        let err = failing_operation().context("While storing upload").unwrap_err();
        assert!(matches!(err, InsightError::Internal(_)));
        assert!(err.to_string().contains("While storing upload"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_error_with_lazy_context() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = io
            .with_context(|| format!("Creating directory {}", "uploads"))
            .unwrap_err();
        assert!(err.to_string().contains("Creating directory uploads"));
    }
}
