//! Error handling for batch and catalog operations.
//!
//! This module defines the error type shared by the wrapped client, the
//! batch engine and the catalog. The engine never inspects these errors;
//! only `safe_get_company_by_urn` looks at the category.

use std::time::Duration;
use thiserror::Error;

/// Main error type for Harmonic batch operations.
///
/// Variants describe where a failure came from so callers can decide what to
/// do with it. The layer itself only distinguishes "not found" from
/// everything else.
#[derive(Debug, Clone, Error)]
pub enum HarmonicError {
    /// The requested entity does not exist in the lookup store
    #[error("{resource} '{id}' not found")]
    NotFound { resource: String, id: String },

    /// The remote API rejected or failed a request
    #[error("{}", fmt_api(.operation, .message, .status_code))]
    Api {
        operation: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Network-related errors (connection, DNS, TLS, ...)
    #[error("{}", fmt_network(.message, .detail))]
    Network {
        message: String,
        detail: Option<String>,
    },

    /// The request could not be built from the given arguments
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// The remote call took too long (reported by the wrapped client)
    #[error("Timeout after {duration:?} during: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Configuration errors (invalid settings, unparsable files)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File I/O errors when reading configuration
    #[error("File error at '{path}': {message}")]
    File { path: String, message: String },

    /// A work unit panicked or was cancelled before finishing
    #[error("Worker failed: {message}")]
    Worker { message: String },

    /// Generic internal errors that don't fit other categories
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn fmt_api(operation: &str, message: &str, status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => format!("API error in '{}' (HTTP {}): {}", operation, code, message),
        None => format!("API error in '{}': {}", operation, message),
    }
}

fn fmt_network(message: &str, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!("Network error: {} (source: {})", message, detail),
        None => format!("Network error: {}", message),
    }
}

impl HarmonicError {
    /// Create a new not-found error.
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a new API error.
    pub fn api<O: Into<String>, M: Into<String>>(operation: O, message: M) -> Self {
        Self::Api {
            operation: operation.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new API error with HTTP status code.
    pub fn api_with_status<O: Into<String>, M: Into<String>>(
        operation: O,
        message: M,
        status_code: u16,
    ) -> Self {
        Self::Api {
            operation: operation.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::Network {
            message: message.into(),
            detail: None,
        }
    }

    /// Create a new network error with details about the underlying cause.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, detail: S) -> Self {
        Self::Network {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// Create a new invalid request error.
    pub fn invalid_request<M: Into<String>>(message: M) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::File {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new worker error.
    pub fn worker<M: Into<String>>(message: M) -> Self {
        Self::Worker {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error means the entity is missing from the lookup store.
    ///
    /// Harmonic's search and lookup stores disagree: some URNs returned by a
    /// search cannot be resolved by id. Those lookups come back either as an
    /// explicit not-found or as an HTTP 404 from the API.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Api { status_code: Some(404), .. }
        )
    }

    /// Check if this error came from the transport rather than the API.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

impl From<serde_json::Error> for HarmonicError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRequest {
            message: format!("JSON serialization failed: {}", err),
        }
    }
}

impl From<std::io::Error> for HarmonicError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<toml::de::Error> for HarmonicError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}

impl From<tokio::task::JoinError> for HarmonicError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            Self::worker(format!("work unit panicked: {}", err))
        } else {
            Self::worker(format!("work unit was cancelled: {}", err))
        }
    }
}
