//! Error hierarchy for LoadRS
//!
//! The analysis engine itself never fails: every calculation has a documented
//! fallback value. These errors cover the shell around it, namely reading
//! session files and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all LoadRS I/O operations
#[derive(Debug, Error)]
pub enum LoadRsError {
    /// Session import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Session import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// File not found at specified path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Unsupported format
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// Format-specific parsing error
    #[error("Parse error in {format} at record {record}: {reason}")]
    ParseError {
        format: String,
        record: usize,
        reason: String,
    },

    /// Missing required column or field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Value present but unusable
    #[error("Invalid value for {field} at record {record}: {value}")]
    InvalidValue {
        field: String,
        record: usize,
        value: String,
    },
}

impl From<serde_json::Error> for LoadRsError {
    fn from(err: serde_json::Error) -> Self {
        LoadRsError::Serialization(err.to_string())
    }
}

/// Result type alias for LoadRS operations
pub type Result<T> = std::result::Result<T, LoadRsError>;

impl LoadRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LoadRsError::Import(ImportError::FileNotFound { .. }) => ErrorSeverity::Warning,
            LoadRsError::Import(ImportError::InvalidValue { .. }) => ErrorSeverity::Warning,
            LoadRsError::Configuration(_) => ErrorSeverity::Error,
            LoadRsError::Io(_) => ErrorSeverity::Error,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LoadRsError::Import(ImportError::FileNotFound { path }) => {
                format!("Could not find session file: {}", path.display())
            }
            LoadRsError::Import(ImportError::UnsupportedFormat { format }) => {
                format!(
                    "Session files must be CSV or JSON (got '{}'). Use --format to override.",
                    format
                )
            }
            LoadRsError::Import(ImportError::MissingField { field }) => {
                format!("Session file is missing the '{}' column.", field)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents operation
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
