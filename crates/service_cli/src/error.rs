//! CLI error types

use adapter_loader::LoaderError;
use margin_core::types::DateError;
use margin_models::products::ProductError;
use margin_models::simulation::ModelError;
use margin_risk::{MarginError, MvaError};
use thiserror::Error;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file error
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    /// Model construction error
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Portfolio construction error
    #[error("Portfolio error: {0}")]
    Product(#[from] ProductError),

    /// Margin computation error
    #[error("Margin error: {0}")]
    Margin(#[from] MarginError),

    /// MVA computation error
    #[error("MVA error: {0}")]
    Mva(#[from] MvaError),

    /// Date error
    #[error("Date error: {0}")]
    Date(#[from] DateError),

    /// JSON output error
    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}
