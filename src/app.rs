//! Client lifecycle: start-up after authentication and teardown on logout.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, info_span, warn, Instrument};

use crate::api::TodoApi;
use crate::config::ClientConfig;
use crate::controller::MutationController;
use crate::reviews::ReviewCarousel;
use crate::scheduler::SessionTimers;
use crate::session::SessionGuard;
use crate::suggest::SuggestionPanel;
use crate::ui::Ui;
use crate::Result;

/// All client state, created at start-up and reset on logout.
pub struct App {
    config: ClientConfig,
    api: Arc<dyn TodoApi>,
    ui: Arc<dyn Ui>,
    session: SessionGuard,
    controller: Arc<MutationController>,
    suggestions: SuggestionPanel,
    reviews: Arc<ReviewCarousel>,
    timers: Mutex<Option<SessionTimers>>,
}

impl App {
    /// Wire the components around one API client and one front end.
    #[must_use]
    pub fn new(config: ClientConfig, api: Arc<dyn TodoApi>, ui: Arc<dyn Ui>) -> Self {
        let controller = Arc::new(MutationController::new(Arc::clone(&api), Arc::clone(&ui)));
        Self::with_controller(config, api, ui, controller)
    }

    /// Like [`App::new`] with a preconfigured controller.
    #[must_use]
    pub fn with_controller(
        config: ClientConfig,
        api: Arc<dyn TodoApi>,
        ui: Arc<dyn Ui>,
        controller: Arc<MutationController>,
    ) -> Self {
        Self {
            session: SessionGuard::new(Arc::clone(&api), Arc::clone(&ui), &config),
            suggestions: SuggestionPanel::new(
                Arc::clone(&api),
                Arc::clone(&ui),
                Arc::clone(&controller),
            ),
            reviews: Arc::new(ReviewCarousel::new(Arc::clone(&api), Arc::clone(&ui))),
            ui,
            controller,
            api,
            config,
            timers: Mutex::new(None),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying API client.
    #[must_use]
    pub fn api(&self) -> &Arc<dyn TodoApi> {
        &self.api
    }

    /// Front end driven by the client.
    #[must_use]
    pub fn ui(&self) -> &Arc<dyn Ui> {
        &self.ui
    }

    /// Session guard.
    #[must_use]
    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    /// Mutation controller owning the task store.
    #[must_use]
    pub fn controller(&self) -> &Arc<MutationController> {
        &self.controller
    }

    /// Suggestion panel.
    #[must_use]
    pub fn suggestions(&self) -> &SuggestionPanel {
        &self.suggestions
    }

    /// Review carousel.
    #[must_use]
    pub fn reviews(&self) -> &Arc<ReviewCarousel> {
        &self.reviews
    }

    /// Whether background timers are running.
    pub async fn timers_running(&self) -> bool {
        self.timers.lock().await.is_some()
    }

    /// Authenticate, load tasks and reviews, then start the timers.
    ///
    /// Returns `false` when the session is not authenticated; nothing is
    /// loaded in that case.
    pub async fn init(&self) -> bool {
        async {
            if !self.session.check_auth().await {
                return false;
            }
            if let Err(err) = self.controller.reload().await {
                warn!(%err, "initial task load failed");
            }
            // Failures are logged inside the carousel.
            let _ = self.reviews.load().await;
            self.start_timers().await;
            true
        }
        .instrument(info_span!("init"))
        .await
    }

    /// Log in and run [`App::init`].
    ///
    /// # Errors
    ///
    /// Returns the login error; nothing is loaded in that case.
    pub async fn login(&self, email: &str, password: &str) -> Result<bool> {
        self.session.login(email, password).await?;
        Ok(self.init().await)
    }

    /// Log out, stop the timers, and drop all session state.
    ///
    /// # Errors
    ///
    /// Returns the logout error; the session and timers are left running.
    pub async fn logout(&self) -> Result<()> {
        self.session.logout().await?;
        self.teardown().await;
        info!("session state reset");
        Ok(())
    }

    /// Stop the timers without touching the session, e.g. on exit.
    pub async fn shutdown(&self) {
        if let Some(timers) = self.timers.lock().await.take() {
            timers.stop().await;
        }
    }

    async fn start_timers(&self) {
        let mut slot = self.timers.lock().await;
        if let Some(previous) = slot.take() {
            previous.stop().await;
        }
        *slot = Some(SessionTimers::start(
            Arc::clone(&self.controller),
            Arc::clone(&self.reviews),
            &self.config.timers,
        ));
    }

    async fn teardown(&self) {
        self.shutdown().await;
        self.controller.clear().await;
        self.reviews.clear().await;
    }
}
