//! Error types for the CSV SMS sender.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! Stage-level failures (`PipelineError`) abort a run; provider failures
//! (`ProviderApiError`) are recorded per row.

use thiserror::Error;

/// Errors that can occur when talking to the messaging provider.
#[derive(Error, Debug)]
pub enum ProviderApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// API returned an error status code
    #[error("API error (status {status}, code {code:?}): {message}")]
    ApiError {
        status: u16,
        code: Option<u32>,
        message: String,
    },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Generic API error with context
    #[error("API error: {0}")]
    Other(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Other(String),
}

/// Fatal errors raised by the reading and column resolution stages.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The CSV file could not be opened or read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The input is not comma-separated values with a header row
    #[error("Failed to parse CSV: {0}")]
    Format(String),

    /// Column index points past the last header
    #[error("Column index {index} is out of range ({available} columns available)")]
    ColumnOutOfRange { index: usize, available: usize },

    /// Named column is not in the header row
    #[error("Column '{0}' not found in header row")]
    ColumnNotFound(String),

    /// Nothing to resolve a column against
    #[error("CSV file contains no data rows")]
    NoRows,

    /// Invalid pipeline configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience type alias for Results with ProviderApiError
pub type ProviderApiResult<T> = Result<T, ProviderApiError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;
