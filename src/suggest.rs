//! Suggestion panel: ranked plan for the pending tasks.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::TodoApi;
use crate::controller::MutationController;
use crate::render::{project_suggestion, SuggestionView};
use crate::ui::Ui;
use crate::{AppError, Result};

/// Alert shown when there is nothing to rank.
pub const NO_PENDING_MESSAGE: &str = "Add some tasks first!";

/// Requests and renders the server's suggested task order.
pub struct SuggestionPanel {
    api: Arc<dyn TodoApi>,
    ui: Arc<dyn Ui>,
    controller: Arc<MutationController>,
}

impl SuggestionPanel {
    /// Panel reading pending counts from `controller`.
    #[must_use]
    pub fn new(
        api: Arc<dyn TodoApi>,
        ui: Arc<dyn Ui>,
        controller: Arc<MutationController>,
    ) -> Self {
        Self {
            api,
            ui,
            controller,
        }
    }

    /// Ask the server to rank the session's pending tasks.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` without any request when nothing is
    /// pending, or the API error after showing it in the panel.
    pub async fn request(&self) -> Result<SuggestionView> {
        let pending = self.controller.stats().await.pending;
        if pending == 0 {
            self.ui.alert(NO_PENDING_MESSAGE);
            return Err(AppError::Validation(NO_PENDING_MESSAGE.into()));
        }

        self.ui.show_status(SuggestionView::LOADING);
        match self.api.suggest().await {
            Ok(suggestion) => {
                info!(
                    pending,
                    ranked = suggestion.ordered_tasks.len(),
                    "suggestion received"
                );
                let view = project_suggestion(&suggestion);
                self.ui.render_suggestion(&view);
                Ok(view)
            }
            Err(err) => {
                warn!(%err, "suggestion request failed");
                self.ui.render_suggestion(&SuggestionView::error(&err.to_string()));
                Err(err)
            }
        }
    }
}
