//! Render-on-change contract between the client core and a front end.
//!
//! The core never formats output itself: every state change produces a
//! view model from [`render`](crate::render) and hands it to a [`Ui`].
//! The terminal front end prints; tests record.

use std::future::Future;
use std::pin::Pin;

use crate::models::SessionInfo;
use crate::render::{ReviewView, SuggestionView, TaskListView};
use crate::reviews::ReviewFormView;

/// Boxed answer to [`Ui::confirm`].
pub type ConfirmFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

/// Front end driven by the client core.
pub trait Ui: Send + Sync {
    /// Replace the visible task list and summary counts.
    fn render_tasks(&self, view: &TaskListView);

    /// Show the current carousel slide; `None` clears it.
    fn render_review(&self, view: Option<&ReviewView>);

    /// Show the review submission form state.
    fn render_review_form(&self, view: &ReviewFormView);

    /// Replace the suggestion panel.
    fn render_suggestion(&self, view: &SuggestionView);

    /// Transient status line, e.g. a loading indicator.
    fn show_status(&self, message: &str);

    /// Signed-in user; `admin_link` is set only for privileged sessions.
    fn show_user(&self, session: &SessionInfo, admin_link: Option<&str>);

    /// Blocking user-facing message.
    fn alert(&self, message: &str);

    /// Ask a yes/no question.
    fn confirm<'a>(&'a self, prompt: &'a str) -> ConfirmFuture<'a>;

    /// Leave the task view for `page` (e.g. the login page).
    fn navigate(&self, page: &str);
}
