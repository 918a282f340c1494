//! Command grammar shared by the interactive client and `taskdeck-ctl`.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{debug, info_span, Instrument};

use crate::app::App;
use crate::models::{Category, NewTask, Priority, TaskId};
use crate::{AppError, Result};

/// What the caller should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading commands.
    Continue,
    /// Leave the client.
    Quit,
}

/// One client command.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Add a task.
    Add {
        /// Task text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// urgent, high, medium, or low.
        #[arg(long, short, default_value_t = Priority::Medium)]
        priority: Priority,
        /// general, work, personal, health, finance, learning, or any other name.
        #[arg(long, short, default_value_t = Category::General)]
        category: Category,
        /// Due date as YYYY-MM-DD.
        #[arg(long, short)]
        due: Option<NaiveDate>,
        /// Estimated minutes.
        #[arg(long, short, default_value_t = 30)]
        time: u32,
        /// Importance rank.
        #[arg(long, short, default_value_t = 3)]
        importance: i32,
    },
    /// Toggle a task between done and pending.
    Done {
        /// Task id.
        id: TaskId,
    },
    /// Delete a task.
    Rm {
        /// Task id.
        id: TaskId,
    },
    /// Reload and show the task list.
    List,
    /// Ask for a suggested task order.
    Suggest,
    /// Reload reviews and show the current one.
    Reviews,
    /// Show the next review.
    Next,
    /// Open the review form.
    Review,
    /// Commit a star rating in the review form.
    Star {
        /// 1 to 5.
        stars: u8,
    },
    /// Preview a star rating in the review form.
    Hover {
        /// 1 to 5.
        stars: u8,
    },
    /// End the star preview.
    Leave,
    /// Submit the review form.
    Submit {
        /// Review text; replaces any draft.
        text: Vec<String>,
    },
    /// Close the review form without submitting.
    Cancel,
    /// Create an account; log in afterwards.
    Register {
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },
    /// Sign in.
    Login {
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },
    /// Sign out.
    Logout,
    /// Check the service health endpoint.
    Health,
    /// Leave the client.
    #[command(alias = "exit")]
    Quit,
}

/// A single interactive input line.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct Line {
    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Command {
    /// Subcommand name, safe to log.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Done { .. } => "done",
            Self::Rm { .. } => "rm",
            Self::List => "list",
            Self::Suggest => "suggest",
            Self::Reviews => "reviews",
            Self::Next => "next",
            Self::Review => "review",
            Self::Star { .. } => "star",
            Self::Hover { .. } => "hover",
            Self::Leave => "leave",
            Self::Submit { .. } => "submit",
            Self::Cancel => "cancel",
            Self::Register { .. } => "register",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Health => "health",
            Self::Quit => "quit",
        }
    }

    /// Whether the command needs a signed-in session. Account commands,
    /// the health check, and the public review list do not.
    #[must_use]
    pub fn needs_session(&self) -> bool {
        !matches!(
            self,
            Self::Register { .. }
                | Self::Login { .. }
                | Self::Health
                | Self::Reviews
                | Self::Next
                | Self::Quit
        )
    }

    /// Build the create payload of an `add` command.
    #[must_use]
    pub fn new_task(
        text: &[String],
        priority: Priority,
        category: Category,
        due: Option<NaiveDate>,
        time: u32,
        importance: i32,
    ) -> NewTask {
        NewTask::new(&text.join(" "))
            .with_priority(priority)
            .with_category(category)
            .with_due_date(due)
            .with_estimated_time(time)
            .with_importance(importance)
    }
}

/// Run `command` against `app`.
///
/// # Errors
///
/// Returns the error of the underlying operation. User-facing reporting
/// has already happened through the [`Ui`](crate::ui::Ui).
pub async fn execute(app: &App, command: Command) -> Result<Flow> {
    let span = info_span!("command", name = command.name());
    debug!(parent: &span, "executing command");
    async move {
        match command {
            Command::Add {
                text,
                priority,
                category,
                due,
                time,
                importance,
            } => {
                let new_task = Command::new_task(&text, priority, category, due, time, importance);
                app.controller().add_task(new_task).await?;
            }
            Command::Done { id } => app.controller().toggle_complete(id).await?,
            Command::Rm { id } => app.controller().delete_task(id).await?,
            Command::List => app.controller().reload().await?,
            Command::Suggest => {
                app.suggestions().request().await?;
            }
            Command::Reviews => app.reviews().load().await?,
            Command::Next => {
                app.reviews().rotate().await;
            }
            Command::Review => app.reviews().open_form().await,
            Command::Star { stars } => app.reviews().click_star(stars).await?,
            Command::Hover { stars } => app.reviews().hover_star(stars).await?,
            Command::Leave => app.reviews().leave_stars().await,
            Command::Submit { text } => {
                if !text.is_empty() {
                    app.reviews().set_text(&text.join(" ")).await;
                }
                app.reviews().submit().await?;
            }
            Command::Cancel => app.reviews().cancel_form().await,
            Command::Register { email, password } => {
                app.session().register(&email, &password).await?;
            }
            Command::Login { email, password } => {
                app.login(&email, &password).await?;
            }
            Command::Logout => app.logout().await?,
            Command::Health => {
                let status = app.api().health().await?;
                app.ui().show_status(&format!("service: {status}"));
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok::<Flow, AppError>(Flow::Continue)
    }
    .instrument(span)
    .await
}
