//! Loader errors.

use std::path::PathBuf;

use margin_models::products::ProductError;
use thiserror::Error;

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing required column
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Invalid data format
    #[error("Invalid data format in row {row}: {message}")]
    InvalidFormat {
        /// Row number (1-indexed, header included)
        row: usize,
        /// What was wrong
        message: String,
    },

    /// Trades could not be grouped into portfolios
    #[error(transparent)]
    Product(#[from] ProductError),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

impl LoaderError {
    pub(crate) fn invalid(row: usize, message: impl std::fmt::Display) -> Self {
        LoaderError::InvalidFormat {
            row,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoaderError::invalid(3, "bad rate");
        assert_eq!(err.to_string(), "Invalid data format in row 3: bad rate");

        let err = LoaderError::FileNotFound(PathBuf::from("missing.csv"));
        assert_eq!(err.to_string(), "File not found: missing.csv");
    }
}
