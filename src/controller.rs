//! Mutation controller: optimistic apply, remote call, reconciliation.
//!
//! Every user action follows the same three phases:
//!
//! 1. apply the change to the [`TaskStore`] and re-render immediately,
//! 2. issue the matching request to the task service,
//! 3. on success settle the change and reload the whole list; on failure
//!    apply the inverse, re-render, and alert.
//!
//! The store lock is held only for the synchronous steps, never across a
//! network call.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::api::TodoApi;
use crate::models::{NewTask, Task, TaskId};
use crate::render::project_tasks;
use crate::store::{OptimisticMutation, Stats, TaskStore};
use crate::ui::Ui;
use crate::{AppError, Result};

/// Alert shown when a task is already being updated.
pub const BUSY_MESSAGE: &str = "That task is still being updated.";
/// Delete confirmation prompt.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

const ADD_FAILED: &str = "Failed to add task. Please try again.";
const UPDATE_FAILED: &str = "Failed to update task. Please try again.";
const DELETE_FAILED: &str = "Failed to delete task. Please try again.";

type Today = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// Sole owner of the [`TaskStore`].
pub struct MutationController {
    api: Arc<dyn TodoApi>,
    ui: Arc<dyn Ui>,
    store: Mutex<TaskStore>,
    today: Today,
}

impl MutationController {
    /// Controller over an empty store, dating badges by the local clock.
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>, ui: Arc<dyn Ui>) -> Self {
        Self {
            api,
            ui,
            store: Mutex::new(TaskStore::new()),
            today: Box::new(|| Local::now().date_naive()),
        }
    }

    /// Replace the clock used for due-date badges.
    #[must_use]
    pub fn with_today(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Box::new(today);
        self
    }

    /// Snapshot of the store contents.
    pub async fn tasks(&self) -> Vec<Task> {
        self.store.lock().await.tasks().to_vec()
    }

    /// Current summary counts.
    pub async fn stats(&self) -> Stats {
        self.store.lock().await.stats()
    }

    /// Re-render the list from the current store contents.
    pub async fn render(&self) {
        let store = self.store.lock().await;
        self.render_locked(&store);
    }

    /// Empty the store, e.g. on logout.
    pub async fn clear(&self) {
        let mut store = self.store.lock().await;
        store.clear();
        self.render_locked(&store);
    }

    /// Replace the store with `GET /tasks` and re-render.
    ///
    /// A reload that lands while an optimistic change is in flight is
    /// dropped; that change reloads once it settles. So is one whose request
    /// went out before the latest local change or applied reload.
    ///
    /// # Errors
    ///
    /// Propagates the API error; the store is left untouched.
    pub async fn reload(&self) -> Result<()> {
        let ticket = self.store.lock().await.reload_ticket();
        let tasks = self.api.list_tasks().await?;
        let count = tasks.len();
        let mut store = self.store.lock().await;
        if store.apply_reload(ticket, tasks) {
            debug!(count, "task list reloaded");
            self.render_locked(&store);
        } else {
            debug!(count, "stale reload dropped");
        }
        Ok(())
    }

    /// Create a task.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` (after alerting) for blank text, or the
    /// API error after the placeholder has been removed again.
    pub async fn add_task(&self, new_task: NewTask) -> Result<()> {
        if let Err(err) = new_task.validate() {
            self.alert_validation(&err);
            return Err(err);
        }

        let span = info_span!("add_task");
        async {
            let mutation = match self.apply(|store| Ok(store.begin_insert(&new_task))).await {
                Ok(mutation) => mutation,
                Err(err) => return Err(err),
            };

            match self.api.add_task(new_task).await {
                Ok(ack) => {
                    info!(message = %ack.message, "task created");
                    self.confirm(&mutation).await;
                    Ok(())
                }
                Err(err) => {
                    warn!(%err, "create rejected, reverting");
                    let message = err.remote_message().map_or_else(
                        || ADD_FAILED.to_owned(),
                        |msg| format!("Error adding task: {msg}"),
                    );
                    self.rollback(mutation, &message).await;
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Flip completion of `id`. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Busy` if the task is already being updated, or the
    /// API error after the flip has been undone.
    pub async fn toggle_complete(&self, id: TaskId) -> Result<()> {
        let span = info_span!("toggle_complete", task_id = id);
        async {
            let mutation = match self.apply(|store| store.begin_toggle(id)).await {
                Ok(mutation) => mutation,
                Err(AppError::NotFound(_)) => return Ok(()),
                Err(err) => return Err(err),
            };

            match self.api.toggle_complete(id).await {
                Ok(()) => {
                    self.confirm(&mutation).await;
                    Ok(())
                }
                Err(err) => {
                    warn!(%err, "toggle rejected, reverting");
                    self.rollback(mutation, UPDATE_FAILED).await;
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Delete `id` after the user confirms. Unknown ids and a declined
    /// confirmation are no-ops.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Busy` if the task is already being updated, or the
    /// API error after the task has been put back in place.
    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        if !self.ui.confirm(DELETE_PROMPT).await {
            debug!(task_id = id, "delete declined");
            return Ok(());
        }

        let span = info_span!("delete_task", task_id = id);
        async {
            let mutation = match self.apply(|store| store.begin_delete(id)).await {
                Ok(mutation) => mutation,
                Err(AppError::NotFound(_)) => return Ok(()),
                Err(err) => return Err(err),
            };

            match self.api.delete_task(id).await {
                Ok(()) => {
                    self.confirm(&mutation).await;
                    Ok(())
                }
                Err(err) => {
                    warn!(%err, "delete rejected, reverting");
                    self.rollback(mutation, DELETE_FAILED).await;
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Phase 1: mutate under the lock and render before any network call.
    async fn apply(
        &self,
        begin: impl FnOnce(&mut TaskStore) -> Result<OptimisticMutation>,
    ) -> Result<OptimisticMutation> {
        let mut store = self.store.lock().await;
        match begin(&mut *store) {
            Ok(mutation) => {
                self.render_locked(&store);
                Ok(mutation)
            }
            Err(err) => {
                if matches!(err, AppError::Busy(_)) {
                    self.ui.alert(BUSY_MESSAGE);
                }
                Err(err)
            }
        }
    }

    /// Phase 3, success: release the guard and reload authoritative state.
    async fn confirm(&self, mutation: &OptimisticMutation) {
        self.store.lock().await.settle(mutation);
        if let Err(err) = self.reload().await {
            warn!(%err, "reload after mutation failed");
        }
    }

    /// Phase 3, failure: undo the change, re-render, alert.
    async fn rollback(&self, mutation: OptimisticMutation, message: &str) {
        {
            let mut store = self.store.lock().await;
            store.revert(mutation);
            self.render_locked(&store);
        }
        self.ui.alert(message);
    }

    fn alert_validation(&self, err: &AppError) {
        if let AppError::Validation(message) = err {
            self.ui.alert(message);
        }
    }

    fn render_locked(&self, store: &TaskStore) {
        let view = project_tasks(store.tasks(), (self.today)());
        self.ui.render_tasks(&view);
    }
}
