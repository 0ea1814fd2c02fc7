//! Error types for the phonepe-pg library.
//!
//! Every fallible operation returns [`PhonePeError`]. Use [`PhonePeError::kind`]
//! to branch on the broad failure class without matching every variant.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for gateway operations.
#[derive(Error, Debug)]
pub enum PhonePeError {
    /// The HTTP exchange failed before a response was received
    #[error("HTTP error: {0}")]
    HttpError(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The call was aborted through its cancellation token
    #[error("Request cancelled")]
    Cancelled,

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during Base64 decoding
    #[error("Base64 error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// Decoded bytes were not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// The gateway answered with an empty body
    #[error("Empty response from gateway (status {status})")]
    EmptyResponse {
        /// HTTP status of the empty response
        status: StatusCode,
    },

    /// Amount was zero or negative
    #[error("Invalid amount for `{field}`: {value} (must be greater than zero)")]
    InvalidAmount {
        /// Name of the offending field
        field: &'static str,
        /// Value that was rejected
        value: i64,
    },

    /// A request field failed validation
    #[error("Invalid field `{field}`: {reason}")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error parsing URL
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// An X-VERIFY value did not match the recomputed checksum
    #[error("Checksum mismatch")]
    ChecksumMismatch,
}

/// Broad classification of a [`PhonePeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network unreachable, TLS failure, timeout
    Transport,
    /// Malformed, empty or non-JSON data
    Parse,
    /// Caller-supplied input was rejected before any I/O
    Validation,
    /// The client configuration is unusable
    Configuration,
    /// Aborted by the caller
    Cancelled,
}

impl PhonePeError {
    /// Returns the failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PhonePeError::HttpError(_) | PhonePeError::Timeout => ErrorKind::Transport,
            PhonePeError::Cancelled => ErrorKind::Cancelled,
            PhonePeError::JsonError(_)
            | PhonePeError::Base64Error(_)
            | PhonePeError::Utf8Error(_)
            | PhonePeError::EmptyResponse { .. }
            | PhonePeError::ChecksumMismatch => ErrorKind::Parse,
            PhonePeError::InvalidAmount { .. }
            | PhonePeError::InvalidField { .. } => ErrorKind::Validation,
            PhonePeError::ConfigError(_) | PhonePeError::UrlParseError(_) => {
                ErrorKind::Configuration
            }
        }
    }

    /// True for failures that happened on the wire.
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

impl From<reqwest::Error> for PhonePeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PhonePeError::Timeout
        } else {
            PhonePeError::HttpError(err)
        }
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, PhonePeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PhonePeError::InvalidAmount {
            field: "amount",
            value: 0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid amount for `amount`: 0 (must be greater than zero)"
        );
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: PhonePeError = json_err.into();
        assert!(matches!(err, PhonePeError::JsonError(_)));
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(PhonePeError::Timeout.kind(), ErrorKind::Transport);
        assert!(PhonePeError::Timeout.is_transport());
        assert_eq!(PhonePeError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            PhonePeError::EmptyResponse {
                status: StatusCode::OK
            }
            .kind(),
            ErrorKind::Parse
        );
        assert_eq!(
            PhonePeError::InvalidField {
                field: "vpa",
                reason: "must not be empty".into()
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            PhonePeError::ConfigError("bad".into()).kind(),
            ErrorKind::Configuration
        );
    }
}
