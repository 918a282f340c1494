//! Client configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{AppError, Result};

/// Keychain service name used for stored session cookies.
pub const KEYRING_SERVICE: &str = "taskdeck";

/// Environment variable consulted when the keychain has no session cookie.
pub const SESSION_ENV_VAR: &str = "TASKDECK_SESSION";

/// Background timer periods, in seconds.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimerConfig {
    /// Period of the full task reload.
    #[serde(default = "default_resync_seconds")]
    pub resync_seconds: u64,
    /// Period of the review carousel rotation.
    #[serde(default = "default_rotation_seconds")]
    pub rotation_seconds: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            resync_seconds: default_resync_seconds(),
            rotation_seconds: default_rotation_seconds(),
        }
    }
}

impl TimerConfig {
    /// Resync period as a [`Duration`].
    #[must_use]
    pub fn resync_period(&self) -> Duration {
        Duration::from_secs(self.resync_seconds)
    }

    /// Rotation period as a [`Duration`].
    #[must_use]
    pub fn rotation_period(&self) -> Duration {
        Duration::from_secs(self.rotation_seconds)
    }
}

fn default_resync_seconds() -> u64 {
    30
}

fn default_rotation_seconds() -> u64 {
    5
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_login_page() -> String {
    "login.html".into()
}

fn default_admin_page() -> String {
    "admin.html".into()
}

/// Client configuration parsed from `taskdeck.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ClientConfig {
    /// Origin of the task service, e.g. `http://127.0.0.1:5000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Page shown to unauthenticated users.
    #[serde(default = "default_login_page")]
    pub login_page: String,
    /// Admin console page, linked only for privileged sessions.
    #[serde(default = "default_admin_page")]
    pub admin_page: String,
    /// Per-request timeout.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    /// Background timer periods.
    #[serde(default)]
    pub timers: TimerConfig,
    /// Session cookie (`name=value`), populated at runtime.
    #[serde(skip)]
    pub session_cookie: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_page: default_login_page(),
            admin_page: default_admin_page(),
            request_timeout_seconds: default_request_timeout_seconds(),
            timers: TimerConfig::default(),
            session_cookie: None,
        }
    }
}

impl ClientConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parsed base URL of the task service.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `base_url` is not a valid URL.
    pub fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|err| AppError::Config(format!("base_url invalid: {err}")))
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Load the session cookie from OS keychain with env-var fallback.
    ///
    /// A missing credential is not an error: the user can still log in
    /// interactively.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the keychain task cannot be joined.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.session_cookie = load_credential("session_cookie", SESSION_ENV_VAR).await?;
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        let base = self.base()?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "base_url must use http or https, got {}",
                base.scheme()
            )));
        }
        // Paths are joined onto the origin; a trailing slash would double up.
        self.base_url = self.base_url.trim_end_matches('/').to_owned();

        if self.timers.resync_seconds == 0 {
            return Err(AppError::Config(
                "timers.resync_seconds must be greater than zero".into(),
            ));
        }
        if self.timers.rotation_seconds == 0 {
            return Err(AppError::Config(
                "timers.rotation_seconds must be greater than zero".into(),
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(AppError::Config(
                "request_timeout_seconds must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<Option<String>> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(Some(value)),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            debug!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    Ok(env::var(env_key).ok().filter(|value| !value.is_empty()))
}
