//! Suggested task order returned by `POST /suggest`.

use serde::{Deserialize, Serialize};

/// One entry of the ranked plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PlannedTask {
    /// 1-based rank.
    pub rank: u32,
    /// Task description.
    pub text: String,
    /// Priority as sent by the ranking engine; may be unknown to this client.
    #[serde(default)]
    pub priority: String,
    /// Human-readable ranking reasons.
    #[serde(default)]
    pub reasons: Vec<String>,
    /// Task category.
    #[serde(default)]
    pub category: Option<String>,
    /// Estimated effort in minutes.
    #[serde(default)]
    pub estimated_time: Option<u32>,
    /// Engine score.
    #[serde(default)]
    pub score: Option<f64>,
    /// Advice on when to schedule the task.
    #[serde(default)]
    pub time_recommendation: Option<String>,
}

/// A task mentioned in a daily plan section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PlanItem {
    /// Task description.
    pub text: String,
    /// Estimated effort in minutes.
    #[serde(default)]
    pub time: Option<u32>,
    /// Ranking reasons, when the section carries them.
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Time-boxed breakdown of the day.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DailyPlan {
    /// Planned minutes.
    #[serde(default)]
    pub total_time_minutes: u32,
    /// Planned hours, rounded to one decimal by the server.
    #[serde(default)]
    pub total_time_hours: f64,
    /// Deep-work tasks for the morning.
    #[serde(default)]
    pub morning_focus: Vec<PlanItem>,
    /// Short tasks to knock out between others.
    #[serde(default)]
    pub quick_wins: Vec<PlanItem>,
    /// Remaining tasks for the afternoon.
    #[serde(default)]
    pub afternoon_tasks: Vec<PlanItem>,
}

impl DailyPlan {
    /// Whether every section is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.morning_focus.is_empty() && self.quick_wins.is_empty() && self.afternoon_tasks.is_empty()
    }
}

/// Full response of the ranking engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Suggestion {
    /// Headline advice.
    #[serde(default)]
    pub suggestion: String,
    /// Ranked plan, best first.
    #[serde(default)]
    pub ordered_tasks: Vec<PlannedTask>,
    /// Pending task count seen by the server.
    #[serde(default)]
    pub total_pending: u32,
    /// Sum of estimates over pending tasks, in minutes.
    #[serde(default)]
    pub total_time_needed: u32,
    /// Optional day breakdown.
    #[serde(default)]
    pub daily_plan: Option<DailyPlan>,
    /// Scheduling advice for the top task.
    #[serde(default)]
    pub top_time_recommendation: Option<String>,
}
