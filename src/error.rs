//! Error types for uid-metadata
//!
//! This module provides error handling for the library, including:
//! - The crate-wide [`Error`] type and [`Result`] alias
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes
//!
//! Per-identifier fetch failures are *not* errors: they are recorded inline in
//! the result table (see [`crate::types::FetchOutcome`]). Only the
//! preconditions and infrastructure failures below abort a run.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for uid-metadata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for uid-metadata
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "metadata.base_url")
        key: Option<String>,
    },

    /// The uploaded table has no identifier column with the expected name
    #[error("missing required column '{column}'")]
    MissingColumn {
        /// The column name that was looked up (case-sensitive)
        column: String,
        /// The header names that were actually present
        available: Vec<String>,
    },

    /// The upload itself could not be read (missing multipart field, bad body, ...)
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook generation error
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// The HTTP client could not be set up (TLS backend, invalid user agent).
    ///
    /// Per-identifier request failures never surface here; they are recorded in
    /// the row's [`FetchOutcome`](crate::types::FetchOutcome).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a [`Error::Config`] tied to a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "missing_column",
///     "message": "missing required column 'UID'",
///     "details": {
///       "column": "UID",
///       "available": ["id", "name"]
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "missing_column", "invalid_upload")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an "unauthorized" error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("unauthorized", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - the request itself is unusable
            Error::Config { .. } => 400,
            Error::InvalidUpload(_) => 400,

            // 422 Unprocessable Entity - readable upload, wrong contents
            Error::MissingColumn { .. } => 422,
            Error::Csv(_) => 422,

            // 500 Internal Server Error
            Error::Spreadsheet(_) => 500,
            Error::Serialization(_) => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
            // Only raised while building the local HTTP client
            Error::Network(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::MissingColumn { .. } => "missing_column",
            Error::InvalidUpload(_) => "invalid_upload",
            Error::Csv(_) => "invalid_csv",
            Error::Spreadsheet(_) => "spreadsheet_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::MissingColumn { column, available } => Some(serde_json::json!({
                "column": column,
                "available": available,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
