//! Session guard: authentication check, registration, login, and logout.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::api::TodoApi;
use crate::config::ClientConfig;
use crate::models::{Credentials, SessionInfo};
use crate::ui::Ui;
use crate::{AppError, Result};

const CREDENTIALS_REQUIRED: &str = "Email and password required";

/// Gatekeeper run before any task data is loaded.
pub struct SessionGuard {
    api: Arc<dyn TodoApi>,
    ui: Arc<dyn Ui>,
    login_page: String,
    admin_page: String,
    current: Mutex<Option<SessionInfo>>,
}

impl SessionGuard {
    /// Guard using the pages named in `config`.
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>, ui: Arc<dyn Ui>, config: &ClientConfig) -> Self {
        Self {
            api,
            ui,
            login_page: config.login_page.clone(),
            admin_page: config.admin_page.clone(),
            current: Mutex::new(None),
        }
    }

    /// Signed-in user, if the last check succeeded.
    pub async fn current(&self) -> Option<SessionInfo> {
        self.current.lock().await.clone()
    }

    /// Verify the session with `GET /check-auth`.
    ///
    /// Returns `false` after navigating to the login page when the session
    /// is missing or the check fails; the caller must not proceed.
    pub async fn check_auth(&self) -> bool {
        let status = match self.api.check_auth().await {
            Ok(status) => status,
            Err(err) => {
                error!(%err, "auth check failed");
                self.redirect_to_login().await;
                return false;
            }
        };

        if !status.authenticated {
            info!("session not authenticated");
            self.redirect_to_login().await;
            return false;
        }

        let session = SessionInfo {
            email: status.email.unwrap_or_default(),
            is_admin: status.is_admin,
        };
        let admin_link = session.is_admin.then_some(self.admin_page.as_str());
        self.ui.show_user(&session, admin_link);
        info!(email = %session.email, is_admin = session.is_admin, "session verified");
        *self.current.lock().await = Some(session);
        true
    }

    /// Create an account with `POST /register`. The server's answer is
    /// alerted either way; the caller still has to log in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for blank fields, otherwise the API
    /// error.
    pub async fn register(&self, email: &str, password: &str) -> Result<()> {
        let credentials = self.credentials(email, password)?;
        let email = credentials.email.clone();
        match self.api.register(credentials).await {
            Ok(ack) => {
                info!(email = %email, "account registered");
                self.ui.alert(&ack.message);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "registration rejected");
                let message = err
                    .remote_message()
                    .unwrap_or("Registration failed. Please try again.");
                self.ui.alert(message);
                Err(err)
            }
        }
    }

    /// Start a session with `POST /login`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for blank fields, otherwise the API
    /// error; the server message is alerted.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let credentials = self.credentials(email, password)?;
        let email = credentials.email.clone();
        match self.api.login(credentials).await {
            Ok(ack) => {
                info!(email = %email, message = %ack.message, "logged in");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "login rejected");
                let message = err.remote_message().unwrap_or("Login failed. Please try again.");
                self.ui.alert(message);
                Err(err)
            }
        }
    }

    /// End the session with `POST /logout` and return to the login page.
    ///
    /// # Errors
    ///
    /// Returns the API error; the session is then left as it was.
    pub async fn logout(&self) -> Result<()> {
        if let Err(err) = self.api.logout().await {
            error!(%err, "logout failed");
            return Err(err);
        }
        info!("logged out");
        self.redirect_to_login().await;
        Ok(())
    }

    fn credentials(&self, email: &str, password: &str) -> Result<Credentials> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.ui.alert(CREDENTIALS_REQUIRED);
            return Err(AppError::Validation(CREDENTIALS_REQUIRED.into()));
        }
        Ok(Credentials {
            email: email.to_owned(),
            password: password.to_owned(),
        })
    }

    async fn redirect_to_login(&self) {
        *self.current.lock().await = None;
        self.ui.navigate(&self.login_page);
    }
}
