//! Terminal front end: prints view models and reads confirmations.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::warn;

use crate::models::SessionInfo;
use crate::render::{ReviewView, SuggestionView, TaskListView};
use crate::reviews::ReviewFormView;
use crate::ui::{ConfirmFuture, Ui};

/// Line reader over stdin, shared between a command loop and prompts.
pub type SharedInput = Arc<Mutex<Lines<BufReader<Stdin>>>>;

/// Open stdin as a [`SharedInput`].
#[must_use]
pub fn stdin_lines() -> SharedInput {
    Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()))
}

/// [`Ui`] writing to stdout.
pub struct TerminalUi {
    input: Option<SharedInput>,
    assume_yes: bool,
    follow_reviews: bool,
}

impl TerminalUi {
    /// Interactive front end; confirmations are read from `input`.
    #[must_use]
    pub fn interactive(input: SharedInput, follow_reviews: bool) -> Self {
        Self {
            input: Some(input),
            assume_yes: false,
            follow_reviews,
        }
    }

    /// One-shot front end; every confirmation is answered with `assume_yes`.
    #[must_use]
    pub fn batch(assume_yes: bool) -> Self {
        Self {
            input: None,
            assume_yes,
            follow_reviews: false,
        }
    }

    /// Print a review slide regardless of the follow setting.
    pub fn print_review(view: Option<&ReviewView>) {
        match view {
            Some(view) => println!("{view}"),
            None => println!("No reviews yet."),
        }
    }
}

impl Ui for TerminalUi {
    fn render_tasks(&self, view: &TaskListView) {
        println!("{view}");
    }

    fn render_review(&self, view: Option<&ReviewView>) {
        // The rotation timer fires every few seconds.
        if self.follow_reviews {
            if let Some(view) = view {
                println!("{view}");
            }
        }
    }

    fn render_review_form(&self, view: &ReviewFormView) {
        if view.visible {
            println!("Your review: {}  {}", view.stars, view.text);
        } else if view.can_open {
            println!("Write a review with `review`.");
        }
    }

    fn render_suggestion(&self, view: &SuggestionView) {
        println!("{view}");
    }

    fn show_status(&self, message: &str) {
        println!("{message}");
    }

    fn show_user(&self, session: &SessionInfo, admin_link: Option<&str>) {
        match admin_link {
            Some(link) => println!("Signed in as {} (admin: {link})", session.email),
            None => println!("Signed in as {}", session.email),
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }

    fn confirm<'a>(&'a self, prompt: &'a str) -> ConfirmFuture<'a> {
        Box::pin(async move {
            let Some(input) = self.input.as_ref() else {
                if !self.assume_yes {
                    println!("{prompt} Skipped; pass --yes to confirm.");
                }
                return self.assume_yes;
            };
            println!("{prompt} [y/N]");
            match input.lock().await.next_line().await {
                Ok(Some(answer)) => {
                    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
                }
                Ok(None) => false,
                Err(err) => {
                    warn!(%err, "failed to read confirmation");
                    false
                }
            }
        })
    }

    fn navigate(&self, page: &str) {
        println!("Not signed in ({page}). Use `login <email> <password>`.");
    }
}
