//! Error types for the NED NL client.
//!
//! # Design
//! Every failure is a `NedError`. Callers that only care about the broad
//! category (re-authenticate, back off and retry, or report a contract
//! change) match on `NedError::kind()` instead of individual variants.

use std::time::Duration;

use thiserror::Error;

/// Broad category of a [`NedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The API key is missing, invalid or expired.
    Authentication,
    /// The request never produced a usable response: timeout, transport
    /// fault, or an HTTP error status other than 403.
    Connection,
    /// The service answered successfully but not in the expected shape.
    Unexpected,
}

/// Errors returned by the NED NL client.
#[derive(Debug, Error)]
pub enum NedError {
    /// No usable API key, or the service rejected it with 403.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The request did not complete within the configured timeout.
    #[error("timeout occurred while connecting to NED NL API (after {0:?})")]
    Timeout(Duration),

    /// The service returned an error status other than 403.
    #[error("error occurred while communicating with NED NL API: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// DNS, socket or TLS failure below the HTTP layer.
    #[error("error occurred while communicating with NED NL API: {0}")]
    Transport(String),

    /// The client session was closed before this request was issued.
    #[error("client session is closed")]
    SessionClosed,

    /// A success status with a content type other than JSON-LD.
    #[error("unexpected content type response from NED NL API: {content_type}")]
    UnexpectedContentType { content_type: String, body: String },

    /// The body was JSON-LD but did not match the expected envelope.
    #[error("failed to decode NED NL response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl NedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NedError::Authentication(_) => ErrorKind::Authentication,
            NedError::Timeout(_)
            | NedError::Status { .. }
            | NedError::Transport(_)
            | NedError::SessionClosed => ErrorKind::Connection,
            NedError::UnexpectedContentType { .. } | NedError::Decode(_) | NedError::Config(_) => {
                ErrorKind::Unexpected
            }
        }
    }

    pub fn is_authentication(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    pub fn is_connection(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }
}
