//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all client failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Transport failure: connection refused, timeout, TLS, and the like.
    Http(String),
    /// The service answered with a non-success status or `success: false`.
    Remote {
        /// HTTP status code returned by the service.
        status: u16,
        /// Server-provided message; empty when the body carried none.
        message: String,
    },
    /// The session is missing or no longer valid. Holds the server message,
    /// if any.
    Unauthorized(String),
    /// Input rejected on the client before any network call.
    Validation(String),
    /// Another operation on the same task is still in flight.
    Busy(String),
    /// Requested entity does not exist in the local store.
    NotFound(String),
    /// Response body could not be decoded.
    Decode(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl AppError {
    /// Server-provided message for a rejected request, if any.
    #[must_use]
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Remote { message, .. } | Self::Unauthorized(message) if !message.is_empty() => {
                Some(message)
            }
            _ => None,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Http(msg) => write!(f, "http: {msg}"),
            Self::Remote { status, message } if message.is_empty() => {
                let reason = reqwest::StatusCode::from_u16(*status)
                    .ok()
                    .and_then(|code| code.canonical_reason())
                    .unwrap_or("request failed");
                write!(f, "remote: {status} {reason}")
            }
            Self::Remote { status, message } => write!(f, "remote: {status} {message}"),
            Self::Unauthorized(msg) if msg.is_empty() => {
                f.write_str("unauthorized: session expired")
            }
            Self::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
            Self::Busy(msg) => write!(f, "busy: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Decode(msg) => write!(f, "decode: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
