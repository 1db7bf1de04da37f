//! Error types for the Subsonic API client.

use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when interacting with a Subsonic server.
///
/// The type is `Clone` because cached lookups coalesce concurrent loads of
/// the same key: when the single in-flight fetch fails, every waiter gets a
/// copy of that failure. Non-clonable causes are held behind an [`Arc`].
#[derive(Debug, Clone, Error)]
pub enum SubsonicError {
    /// HTTP transport error (connection refused, DNS, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[source] Arc<reqwest::Error>),

    /// The request did not complete within the configured timeout.
    #[error("connection timed out")]
    Timeout,

    /// The server answered with an HTTP status outside `200..300`.
    #[error("failed to connect to server (HTTP status {0})")]
    Status(u16),

    /// The envelope's `status` was not `ok`.
    ///
    /// Common codes:
    /// - `10`: required parameter is missing
    /// - `40`: wrong username or password
    /// - `50`: user is not authorized for the given operation
    /// - `70`: the requested data was not found
    #[error("API error (code {code}): {message}")]
    Api {
        /// Subsonic error code (not the HTTP status).
        code: i64,
        /// Human-readable error message from the server.
        message: String,
    },

    /// The envelope reported success but a key the action requires is
    /// absent.
    #[error("unexpected response from server: missing key `{0}`")]
    MissingKey(String),

    /// The body was not JSON, or the payload did not have the expected
    /// shape.
    #[error("JSON error: {0}")]
    Json(#[source] Arc<serde_json::Error>),

    /// A caller-supplied value could not be resolved locally.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of a [`SubsonicError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport-level failure: DNS, connect, timeout, non-2xx status.
    Connection,
    /// Application-level failure reported or caused by the server.
    Server,
    /// Caller input that was rejected before any request was made.
    InvalidArgument,
}

impl SubsonicError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Timeout | Self::Status(_) => ErrorKind::Connection,
            Self::Api { .. } | Self::MissingKey(_) | Self::Json(_) => ErrorKind::Server,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Shorthand for `self.kind() == ErrorKind::Connection`.
    pub fn is_connection(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }
}

impl From<reqwest::Error> for SubsonicError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(Arc::new(err))
        }
    }
}

impl From<serde_json::Error> for SubsonicError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(Arc::new(err))
    }
}

impl From<Arc<SubsonicError>> for SubsonicError {
    fn from(err: Arc<SubsonicError>) -> Self {
        Arc::unwrap_or_clone(err)
    }
}

/// Convenience alias for `Result<T, SubsonicError>`.
pub type Result<T> = std::result::Result<T, SubsonicError>;
