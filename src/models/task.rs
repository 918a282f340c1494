//! Task model mirrored from the task service.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{AppError, Result};

/// Server-assigned task identifier. Provisional ids are negative.
pub type TaskId = i64;

/// Urgency of a task.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Needs attention right now.
    Urgent,
    /// Important and time-sensitive.
    High,
    /// Default priority.
    #[default]
    Medium,
    /// Can wait.
    Low,
}

impl Priority {
    /// Wire name of the priority.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "urgent" => Ok(Self::Urgent),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(AppError::Validation(format!("unknown priority: {other}"))),
        }
    }
}

/// Task category. Unknown server values are preserved verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Default category; not badged.
    #[default]
    General,
    /// Work-related.
    Work,
    /// Personal errands.
    Personal,
    /// Health and fitness.
    Health,
    /// Money matters.
    Finance,
    /// Study and courses.
    Learning,
    /// Any category this client does not know about.
    Other(String),
}

impl Category {
    /// Wire name of the category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::General => "general",
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Health => "health",
            Self::Finance => "finance",
            Self::Learning => "learning",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "general" => Self::General,
            "work" => Self::Work,
            "personal" => Self::Personal,
            "health" => Self::Health,
            "finance" => Self::Finance,
            "learning" => Self::Learning,
            _ => Self::Other(raw),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_owned()
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().to_ascii_lowercase();
        if trimmed.is_empty() {
            return Err(AppError::Validation("category must not be empty".into()));
        }
        Ok(Self::from(trimmed))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_estimated_time() -> u32 {
    30
}

fn default_importance() -> i32 {
    3
}

// Server columns are nullable; a null decodes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Unknown or missing priorities fall back to the default.
fn lenient_priority<'de, D>(deserializer: D) -> std::result::Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|name| name.parse().ok())
        .unwrap_or_default())
}

fn estimated_time_or_default<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(default_estimated_time))
}

fn importance_or_default<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or_else(default_importance))
}

// Anything other than a `YYYY-MM-DD` string means "no due date".
fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|text| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()))
}

/// A task as listed by `GET /tasks`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    /// Unique identifier within the list.
    pub id: TaskId,
    /// Task description.
    pub text: String,
    /// Urgency; unknown server values decode as the default.
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
    /// Category.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Category,
    /// Optional due date.
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    /// Estimated effort in minutes.
    #[serde(
        default = "default_estimated_time",
        deserialize_with = "estimated_time_or_default"
    )]
    pub estimated_time: u32,
    /// Importance rank.
    #[serde(
        default = "default_importance",
        deserialize_with = "importance_or_default"
    )]
    pub importance: i32,
    /// Completion flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    /// Server creation timestamp, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Task {
    /// Build the local placeholder shown while a create request is in flight.
    #[must_use]
    pub fn provisional(id: TaskId, new_task: &NewTask) -> Self {
        Self {
            id,
            text: new_task.text.clone(),
            priority: new_task.priority,
            category: new_task.category.clone(),
            due_date: new_task.due_date,
            estimated_time: new_task.estimated_time,
            importance: new_task.importance,
            completed: false,
            created_at: None,
        }
    }

    /// Whether this record is a local placeholder rather than a server row.
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.id < 0
    }
}

/// Create payload for `POST /add-task`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct NewTask {
    /// Task description, trimmed.
    pub text: String,
    /// Urgency.
    pub priority: Priority,
    /// Category.
    pub category: Category,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Estimated effort in minutes.
    pub estimated_time: u32,
    /// Importance rank.
    pub importance: i32,
}

impl NewTask {
    /// Start a create payload with trimmed text and default metadata.
    ///
    /// The text is not checked here; see [`NewTask::validate`].
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.trim().to_owned(),
            priority: Priority::default(),
            category: Category::default(),
            due_date: None,
            estimated_time: default_estimated_time(),
            importance: default_importance(),
        }
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Set the estimated effort in minutes.
    #[must_use]
    pub fn with_estimated_time(mut self, minutes: u32) -> Self {
        self.estimated_time = minutes;
        self
    }

    /// Set the importance rank.
    #[must_use]
    pub fn with_importance(mut self, importance: i32) -> Self {
        self.importance = importance;
        self
    }

    /// Check the payload before any optimistic mutation.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for blank text or a zero estimate.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(AppError::Validation("Please enter a task!".into()));
        }
        if self.estimated_time == 0 {
            return Err(AppError::Validation(
                "Estimated time must be at least one minute".into(),
            ));
        }
        Ok(())
    }
}
