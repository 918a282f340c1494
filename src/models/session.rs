//! Authentication and acknowledgement payloads.

use serde::{Deserialize, Serialize};

/// Response of `GET /check-auth`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AuthStatus {
    /// Whether the cookie maps to a live session.
    #[serde(default)]
    pub authenticated: bool,
    /// Signed-in user's email.
    #[serde(default)]
    pub email: Option<String>,
    /// Whether the user may open the admin console.
    #[serde(default)]
    pub is_admin: bool,
}

/// Generic `{success, message}` body returned by write endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ApiAck {
    /// Whether the server accepted the request.
    #[serde(default)]
    pub success: bool,
    /// Human-readable outcome.
    #[serde(default)]
    pub message: String,
}

/// Body of `POST /login` and `POST /register`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Signed-in user as known to this client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Account email.
    pub email: String,
    /// Whether the admin console link is shown.
    pub is_admin: bool,
}
