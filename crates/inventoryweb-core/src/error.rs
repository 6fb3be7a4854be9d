//! Error types for inventoryweb-core
//!
//! The `Display` text of [`CoreError`] is exactly what the dashboard shows in
//! its error banner, so variants carrying an upstream description print it
//! verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Endpoint answered with a non-success status
    HttpStatus,
    /// Request never produced a response
    Transport,
    /// Response body is not a valid inventory payload
    InvalidPayload,
    /// HTTP client could not be constructed
    ClientBuild,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::HttpStatus => write!(f, "HTTP_STATUS"),
            ErrorCode::Transport => write!(f, "TRANSPORT"),
            ErrorCode::InvalidPayload => write!(f, "INVALID_PAYLOAD"),
            ErrorCode::ClientBuild => write!(f, "CLIENT_BUILD"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - the activation failed but the next one may succeed
    Warning,
    /// Error - the activation failed
    Error,
    /// Critical - the dashboard cannot work at all
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for inventoryweb-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("API call failed with status {status}")]
    HttpStatus { status: u16 },

    #[error("{message}")]
    Transport { message: String },

    #[error("{message}")]
    InvalidPayload { message: String },

    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::HttpStatus { .. } => ErrorCode::HttpStatus,
            CoreError::Transport { .. } => ErrorCode::Transport,
            CoreError::InvalidPayload { .. } => ErrorCode::InvalidPayload,
            CoreError::ClientBuild { .. } => ErrorCode::ClientBuild,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::HttpStatus { status } if *status >= 500 => ErrorSeverity::Warning,
            CoreError::HttpStatus { .. } => ErrorSeverity::Error,
            CoreError::Transport { .. } => ErrorSeverity::Warning,
            CoreError::InvalidPayload { .. } => ErrorSeverity::Error,
            CoreError::ClientBuild { .. } => ErrorSeverity::Critical,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<reqwest::Error> for CoreError {
    fn from(error: reqwest::Error) -> Self {
        CoreError::Transport {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::InvalidPayload {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::HttpStatus.to_string(), "HTTP_STATUS");
        assert_eq!(ErrorCode::InvalidPayload.to_string(), "INVALID_PAYLOAD");
    }

    #[test]
    fn test_http_status_message() {
        let error = CoreError::HttpStatus { status: 500 };
        assert_eq!(error.to_string(), "API call failed with status 500");
        assert_eq!(error.code(), ErrorCode::HttpStatus);
        assert_eq!(error.severity(), ErrorSeverity::Warning);

        let error = CoreError::HttpStatus { status: 403 };
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_description_is_verbatim() {
        let error = CoreError::Transport {
            message: "connection refused".to_string(),
        };
        assert_eq!(error.to_string(), "connection refused");
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = CoreError::from(parse);
        assert_eq!(error.code(), ErrorCode::InvalidPayload);
        assert!(!error.to_string().is_empty());
    }
}
