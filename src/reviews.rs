//! Review carousel, star picker, and submission form.
//!
//! The carousel owns its own review list and rotation index, independent
//! of the task store. Rotation and the picker are plain state machines;
//! [`ReviewCarousel`] wires them to the API and the [`Ui`].

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::TodoApi;
use crate::models::review::MAX_STARS;
use crate::models::{NewReview, Rating, Review};
use crate::render::{project_review, star_glyphs, ReviewView};
use crate::ui::Ui;
use crate::{AppError, Result};

/// Alert shown when submitting without a rating.
pub const NO_RATING_MESSAGE: &str = "Please select a star rating!";
const SUBMIT_FAILED: &str = "Failed to submit review. Please try again.";

/// Reviews plus the index of the slide on display.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    reviews: Vec<Review>,
    index: usize,
}

impl Carousel {
    /// Replace the reviews and return to the first slide.
    pub fn replace(&mut self, reviews: Vec<Review>) {
        self.reviews = reviews;
        self.index = 0;
    }

    /// Loaded reviews.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Index of the slide on display.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Review on display, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Review> {
        self.reviews.get(self.index)
    }

    /// Advance to the next review, wrapping around. No-op when empty.
    pub fn rotate(&mut self) -> Option<usize> {
        if self.reviews.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.reviews.len();
        Some(self.index)
    }
}

/// Five-star input with a hover preview distinct from the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarPicker {
    selected: u8,
    hover: Option<u8>,
}

impl StarPicker {
    /// Committed rating; `0` means none.
    #[must_use]
    pub fn selected(&self) -> u8 {
        self.selected
    }

    /// Star under the pointer, if any.
    #[must_use]
    pub fn hover(&self) -> Option<u8> {
        self.hover
    }

    /// Commit `star` as the rating.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `star` is outside `1..=5`.
    pub fn click(&mut self, star: u8) -> Result<()> {
        self.selected = Rating::try_from(star)?.get();
        Ok(())
    }

    /// Preview `star` without committing it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `star` is outside `1..=5`.
    pub fn preview(&mut self, star: u8) -> Result<()> {
        self.hover = Some(Rating::try_from(star)?.get());
        Ok(())
    }

    /// End the preview; the committed rating shows again.
    pub fn leave(&mut self) {
        self.hover = None;
    }

    /// Clear both selection and preview.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether `star` is drawn highlighted.
    #[must_use]
    pub fn lit(&self, star: u8) -> bool {
        star <= self.hover.unwrap_or(self.selected)
    }

    /// Number of highlighted stars.
    #[must_use]
    pub fn lit_count(&self) -> u8 {
        self.hover.unwrap_or(self.selected).min(MAX_STARS)
    }
}

/// Submission form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    /// Whether the form is open.
    pub visible: bool,
    /// Whether the "write a review" affordance is offered.
    pub can_open: bool,
    /// Rating input.
    pub picker: StarPicker,
    /// Draft text.
    pub text: String,
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self {
            visible: false,
            can_open: true,
            picker: StarPicker::default(),
            text: String::new(),
        }
    }
}

impl ReviewForm {
    fn clear_inputs(&mut self) {
        self.picker.reset();
        self.text.clear();
    }
}

/// Rendered submission form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFormView {
    /// Whether the form is open.
    pub visible: bool,
    /// Whether the open affordance is shown.
    pub can_open: bool,
    /// Star glyphs honouring the hover preview.
    pub stars: String,
    /// Committed rating; `0` means none.
    pub selected: u8,
    /// Draft text.
    pub text: String,
}

impl From<&ReviewForm> for ReviewFormView {
    fn from(form: &ReviewForm) -> Self {
        Self {
            visible: form.visible,
            can_open: form.can_open,
            stars: star_glyphs(form.picker.lit_count()),
            selected: form.picker.selected(),
            text: form.text.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct CarouselState {
    carousel: Carousel,
    form: ReviewForm,
}

/// Review list, rotation, and submission wired to the API.
pub struct ReviewCarousel {
    api: Arc<dyn TodoApi>,
    ui: Arc<dyn Ui>,
    state: Mutex<CarouselState>,
}

impl ReviewCarousel {
    /// Empty carousel.
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>, ui: Arc<dyn Ui>) -> Self {
        Self {
            api,
            ui,
            state: Mutex::new(CarouselState::default()),
        }
    }

    /// Fetch `GET /reviews` and show the first one.
    ///
    /// # Errors
    ///
    /// Returns the API error; the previous list stays on display.
    pub async fn load(&self) -> Result<()> {
        let reviews = match self.api.list_reviews().await {
            Ok(reviews) => reviews,
            Err(err) => {
                warn!(%err, "failed to load reviews");
                return Err(err);
            }
        };
        debug!(count = reviews.len(), "reviews loaded");

        let mut state = self.state.lock().await;
        state.carousel.replace(reviews);
        if let Some(review) = state.carousel.current() {
            self.ui.render_review(Some(&project_review(review)));
        }
        Ok(())
    }

    /// Slide on display.
    pub async fn current(&self) -> Option<ReviewView> {
        self.state.lock().await.carousel.current().map(project_review)
    }

    /// Index of the slide on display.
    pub async fn index(&self) -> usize {
        self.state.lock().await.carousel.index()
    }

    /// Number of loaded reviews.
    pub async fn len(&self) -> usize {
        self.state.lock().await.carousel.reviews().len()
    }

    /// Whether no reviews are loaded.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Advance to and show the next review. No-op when empty.
    pub async fn rotate(&self) -> Option<usize> {
        let mut state = self.state.lock().await;
        let index = state.carousel.rotate()?;
        if let Some(review) = state.carousel.current() {
            self.ui.render_review(Some(&project_review(review)));
        }
        Some(index)
    }

    /// Drop all reviews and reset the form, e.g. on logout.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        *state = CarouselState::default();
        self.ui.render_review(None);
    }

    /// Snapshot of the form.
    pub async fn form(&self) -> ReviewFormView {
        ReviewFormView::from(&self.state.lock().await.form)
    }

    /// Open the submission form.
    pub async fn open_form(&self) {
        self.update_form(|form| {
            form.visible = true;
            form.can_open = false;
        })
        .await;
    }

    /// Close the form, discarding the rating and text.
    pub async fn cancel_form(&self) {
        self.update_form(|form| {
            form.visible = false;
            form.can_open = true;
            form.clear_inputs();
        })
        .await;
    }

    /// Commit a star rating.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `star` is outside `1..=5`.
    pub async fn click_star(&self, star: u8) -> Result<()> {
        self.try_update_form(|form| form.picker.click(star)).await
    }

    /// Preview a star rating.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `star` is outside `1..=5`.
    pub async fn hover_star(&self, star: u8) -> Result<()> {
        self.try_update_form(|form| form.picker.preview(star)).await
    }

    /// End the preview.
    pub async fn leave_stars(&self) {
        self.update_form(|form| form.picker.leave()).await;
    }

    /// Replace the draft text.
    pub async fn set_text(&self, text: &str) {
        self.update_form(|form| text.clone_into(&mut form.text)).await;
    }

    /// Submit the form with `POST /add-review`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` without any request when no rating is
    /// selected, otherwise the API error; each case is alerted.
    pub async fn submit(&self) -> Result<()> {
        let (selected, text) = {
            let state = self.state.lock().await;
            (state.form.picker.selected(), state.form.text.clone())
        };
        let Ok(rating) = Rating::try_from(selected) else {
            self.ui.alert(NO_RATING_MESSAGE);
            return Err(AppError::Validation(NO_RATING_MESSAGE.into()));
        };

        match self.api.add_review(NewReview::new(rating, &text)).await {
            Ok(ack) => {
                info!(rating = rating.get(), "review submitted");
                self.ui.alert(&format!("✅ {}", ack.message));
                self.update_form(|form| {
                    form.visible = false;
                    form.can_open = false;
                    form.clear_inputs();
                })
                .await;
                if let Err(err) = self.load().await {
                    warn!(%err, "reload after review failed");
                }
                Ok(())
            }
            Err(err) => {
                warn!(%err, "review rejected");
                match err.remote_message() {
                    Some(message) => self.ui.alert(&format!("❌ {message}")),
                    None => self.ui.alert(SUBMIT_FAILED),
                }
                Err(err)
            }
        }
    }

    async fn update_form(&self, change: impl FnOnce(&mut ReviewForm)) {
        let mut state = self.state.lock().await;
        change(&mut state.form);
        self.ui.render_review_form(&ReviewFormView::from(&state.form));
    }

    async fn try_update_form(&self, change: impl FnOnce(&mut ReviewForm) -> Result<()>) -> Result<()> {
        let mut state = self.state.lock().await;
        change(&mut state.form)?;
        self.ui.render_review_form(&ReviewFormView::from(&state.form));
        Ok(())
    }
}
