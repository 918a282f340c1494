//! Review model and star rating value.

use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// Highest star rating.
pub const MAX_STARS: u8 = 5;

/// Star rating guaranteed to lie in `1..=5`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Number of filled stars.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self> {
        if (1..=MAX_STARS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AppError::Validation(format!(
                "rating must be 1-{MAX_STARS} stars, got {value}"
            )))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A published review from `GET /reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Review {
    /// Server identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Star rating.
    pub rating: Rating,
    /// Free text; may be empty.
    #[serde(default)]
    pub text: Option<String>,
    /// Anonymized author identifier.
    #[serde(default)]
    pub user_email: String,
    /// Server creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Submission payload for `POST /add-review`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewReview {
    /// Selected star rating.
    pub rating: Rating,
    /// Review text, trimmed.
    pub text: String,
}

impl NewReview {
    /// Build a submission with trimmed text.
    #[must_use]
    pub fn new(rating: Rating, text: &str) -> Self {
        Self {
            rating,
            text: text.trim().to_owned(),
        }
    }
}
