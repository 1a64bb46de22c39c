//! Error type definitions for the Antennas service

use serde::Serialize;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors (fatal at startup)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Upstream backend errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Guide artifact errors
    #[error("Guide error: {message}")]
    Guide { message: String },

    /// Filesystem and socket errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors talking to the upstream listings backend
///
/// Every variant is recoverable: callers degrade the affected section and log.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Credentials rejected (401/403)
    #[error("Authentication failed: HTTP {status}")]
    Unauthorized { status: u16 },

    /// Connection could not be established
    #[error("Backend unreachable: {url} - {message}")]
    Unreachable { url: String, message: String },

    /// Request exceeded the configured timeout
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    /// Any other non-success HTTP status
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Response body could not be parsed, even after sanitizing
    #[error("Parse error: {message}")]
    Parse { message: String },
}

/// Backend connectivity as reported to operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Ok,
    AuthenticationFailed,
    Unreachable,
    Unknown,
}

impl ConnectionStatus {
    /// Human-readable message shown on the status endpoint
    pub fn message(&self) -> &'static str {
        match self {
            ConnectionStatus::Ok => "All systems go",
            ConnectionStatus::AuthenticationFailed => "Failed to authenticate with Tvheadend",
            ConnectionStatus::Unreachable => {
                "Unable to find Tvheadend server, make sure the server is up and the configuration is pointing to the right spot"
            }
            ConnectionStatus::Unknown => "Unknown error, check the logs for more details",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a guide artifact error
    pub fn guide<S: Into<String>>(message: S) -> Self {
        Self::Guide {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl BackendError {
    /// Create a parse error
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Classify a transport error from the HTTP client
    pub fn from_transport(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Unreachable {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::from_status(status.as_u16(), error.to_string())
        } else {
            Self::Http {
                status: 0,
                message: error.to_string(),
            }
        }
    }

    /// Classify a non-success HTTP status
    pub fn from_status<M: Into<String>>(status: u16, message: M) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status },
            _ => Self::Http {
                status,
                message: message.into(),
            },
        }
    }

    /// Map this error onto the operator-facing connectivity categories
    pub fn connection_status(&self) -> ConnectionStatus {
        match self {
            BackendError::Unauthorized { .. } => ConnectionStatus::AuthenticationFailed,
            BackendError::Unreachable { .. } | BackendError::Timeout { .. } => {
                ConnectionStatus::Unreachable
            }
            BackendError::Http { .. } | BackendError::Parse { .. } => ConnectionStatus::Unknown,
        }
    }
}
