//! Error types for the Erda CLI
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the Erda CLI
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("context {name} not found")]
    ContextNotFound { name: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("status-code: {status}, content-type: {content_type}, raw body: {body}")]
    HttpStatus {
        status: u16,
        content_type: String,
        body: String,
    },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Platform API Errors
    // ============================================================================
    #[error("{operation}: {message}")]
    Api { operation: String, message: String },

    // ============================================================================
    // Identifier Resolution Errors
    // ============================================================================
    #[error("Invalid {kind} name {name}, may not exist or has no permission")]
    NotFound { kind: String, name: String },

    #[error("Invalid {kind}: {message}")]
    Resolve { kind: String, message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    // ============================================================================
    // Paging Errors
    // ============================================================================
    #[error("Invalid page size {page_size}, must be at least 1")]
    InvalidPageSize { page_size: u32 },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(
        status: u16,
        content_type: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::HttpStatus {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Create an API error scoped to an operation (`list`, `create`, ...)
    pub fn api(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a lookup-by-name miss
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a resolution error
    pub fn resolve(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolve {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type alias for the Erda CLI
pub type Result<T> = std::result::Result<T, Error>;
