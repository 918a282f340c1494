//! Pure projection of client state into view models.
//!
//! Nothing here performs I/O: the mutation controller and the panels call
//! these functions on every state change and hand the result to the
//! [`Ui`](crate::ui::Ui). The `Display` impls produce the terminal text.

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

use crate::models::review::MAX_STARS;
use crate::models::{Category, DailyPlan, PlanItem, Priority, Review, Suggestion, Task, TaskId};
use crate::store::Stats;

const ALERT_STYLE: &str = "\x1b[41;97m";
const RESET_STYLE: &str = "\x1b[0m";

/// Default colour for plan entries whose priority is unknown.
pub const DEFAULT_PLAN_COLOR: &str = "#667eea";

/// Which task attribute a badge encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    /// Urgency.
    Priority,
    /// Non-default category.
    Category,
    /// Estimated effort.
    Time,
    /// Due date relative to today.
    Due,
}

/// Small label encoding one task attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Encoded attribute.
    pub kind: BadgeKind,
    /// Display text.
    pub label: String,
    /// High-alert styling (overdue).
    pub alert: bool,
}

impl Badge {
    fn plain(kind: BadgeKind, label: String) -> Self {
        Self {
            kind,
            label,
            alert: false,
        }
    }
}

impl Display for Badge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.alert {
            write!(f, "{ALERT_STYLE}{}{RESET_STYLE}", self.label)
        } else {
            write!(f, "[{}]", self.label)
        }
    }
}

/// Due date classified against today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Due date has passed.
    Overdue,
    /// Due today.
    Today,
    /// Due tomorrow.
    Tomorrow,
    /// Due in the given number of days (two or more).
    InDays(i64),
}

impl DueStatus {
    /// Classify `due` relative to `today` by calendar-day difference.
    #[must_use]
    pub fn classify(due: NaiveDate, today: NaiveDate) -> Self {
        match (due - today).num_days() {
            days if days < 0 => Self::Overdue,
            0 => Self::Today,
            1 => Self::Tomorrow,
            days => Self::InDays(days),
        }
    }
}

/// Priority badge text: emoji and upper-cased name.
#[must_use]
pub fn priority_badge(priority: Priority) -> Badge {
    let emoji = match priority {
        Priority::Urgent => "🔴",
        Priority::High => "🟠",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    };
    Badge::plain(
        BadgeKind::Priority,
        format!("{emoji} {}", priority.as_str().to_uppercase()),
    )
}

/// Category badge; `None` for the default category.
#[must_use]
pub fn category_badge(category: &Category) -> Option<Badge> {
    let emoji = match category {
        Category::General => return None,
        Category::Work => "💼",
        Category::Personal => "👤",
        Category::Health => "❤️",
        Category::Finance => "💰",
        Category::Learning => "📚",
        Category::Other(_) => "📋",
    };
    Some(Badge::plain(
        BadgeKind::Category,
        format!("{emoji} {}", category.as_str()),
    ))
}

/// Estimated effort badge.
#[must_use]
pub fn time_badge(minutes: u32) -> Badge {
    Badge::plain(BadgeKind::Time, format!("⏱️ {minutes} min"))
}

/// Due-date badge; `None` when there is no due date.
#[must_use]
pub fn due_badge(due: Option<NaiveDate>, today: NaiveDate) -> Option<Badge> {
    let badge = match DueStatus::classify(due?, today) {
        DueStatus::Overdue => Badge {
            kind: BadgeKind::Due,
            label: "⚠️ OVERDUE".into(),
            alert: true,
        },
        DueStatus::Today => Badge::plain(BadgeKind::Due, "📅 Today".into()),
        DueStatus::Tomorrow => Badge::plain(BadgeKind::Due, "📅 Tomorrow".into()),
        DueStatus::InDays(days) => Badge::plain(BadgeKind::Due, format!("📅 {days} days")),
    };
    Some(badge)
}

/// One rendered task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// Task id, provisional ids included.
    pub id: TaskId,
    /// Task description.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// Badges in display order: priority, category, time, due.
    pub badges: Vec<Badge>,
    /// Label of the completion toggle.
    pub toggle_label: &'static str,
    /// Label of the delete action.
    pub delete_label: &'static str,
}

/// Derive the row for a single task.
#[must_use]
pub fn project_task(task: &Task, today: NaiveDate) -> TaskView {
    let mut badges = vec![priority_badge(task.priority)];
    badges.extend(category_badge(&task.category));
    badges.push(time_badge(task.estimated_time));
    badges.extend(due_badge(task.due_date, today));

    TaskView {
        id: task.id,
        text: task.text.clone(),
        completed: task.completed,
        badges,
        toggle_label: if task.completed { "↺ Undo" } else { "✓ Done" },
        delete_label: "✕ Delete",
    }
}

impl Display for TaskView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let check = if self.completed { "x" } else { " " };
        let id = if self.id < 0 {
            "…".to_owned()
        } else {
            self.id.to_string()
        };
        write!(f, "{id:>5} [{check}] {}", self.text)?;
        for badge in &self.badges {
            write!(f, " {badge}")?;
        }
        write!(f, "  ({} · {})", self.toggle_label, self.delete_label)
    }
}

/// The whole task list plus summary counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListView {
    /// Rows in store order.
    pub items: Vec<TaskView>,
    /// Summary counts.
    pub stats: Stats,
}

/// Rebuild the full list view from the store contents.
#[must_use]
pub fn project_tasks(tasks: &[Task], today: NaiveDate) -> TaskListView {
    TaskListView {
        items: tasks.iter().map(|task| project_task(task, today)).collect(),
        stats: Stats::of(tasks),
    }
}

impl Display for TaskListView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.items.is_empty() {
            writeln!(f, "  (no tasks)")?;
        }
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        write!(
            f,
            "Total: {}  Completed: {}  Pending: {}",
            self.stats.total, self.stats.completed, self.stats.pending
        )
    }
}

/// Border colour of a plan entry.
#[must_use]
pub fn plan_color(priority: &str) -> &'static str {
    match priority.parse::<Priority>() {
        Ok(Priority::Urgent) => "#dc3545",
        Ok(Priority::High) => "#fd7e14",
        Ok(Priority::Medium) => "#0984e3",
        Ok(Priority::Low) => "#6c757d",
        Err(_) => DEFAULT_PLAN_COLOR,
    }
}

/// Join ranking reasons for display.
#[must_use]
pub fn reasons_label(reasons: &[String]) -> String {
    if reasons.is_empty() {
        "Standard priority".into()
    } else {
        reasons.join(" • ")
    }
}

/// Minutes converted to whole hours, rounding half up.
#[must_use]
pub fn minutes_to_hours(minutes: u32) -> u32 {
    minutes.saturating_add(30) / 60
}

/// One ranked entry of the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntryView {
    /// 1-based rank.
    pub rank: u32,
    /// Task description.
    pub text: String,
    /// Reasons joined with ` • `.
    pub reasons: String,
    /// Priority colour.
    pub color: &'static str,
}

/// A named daily plan section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSectionView {
    /// Section heading.
    pub title: &'static str,
    /// One line per task.
    pub lines: Vec<String>,
}

/// Rendered suggestion panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionView {
    /// Headline, `💡`-prefixed on success or `❌`-prefixed on failure.
    pub headline: String,
    /// Summary line above the plan.
    pub summary: Option<String>,
    /// Ranked entries; empty hides the plan.
    pub entries: Vec<PlanEntryView>,
    /// Planned time of the daily plan, when it has any section.
    pub plan_total: Option<String>,
    /// Daily plan sections that have content.
    pub sections: Vec<PlanSectionView>,
    /// Scheduling advice for the top task.
    pub time_recommendation: Option<String>,
}

impl SuggestionView {
    /// Loading indicator text.
    pub const LOADING: &'static str = "🤔 AI is analyzing your tasks...";

    /// Panel content after a failed request.
    #[must_use]
    pub fn error(message: &str) -> Self {
        Self {
            headline: format!("❌ Error: {message}"),
            summary: None,
            entries: Vec::new(),
            plan_total: None,
            sections: Vec::new(),
            time_recommendation: None,
        }
    }

    /// Whether the ranked plan is shown.
    #[must_use]
    pub fn shows_plan(&self) -> bool {
        !self.entries.is_empty()
    }
}

fn plan_section(title: &'static str, items: &[PlanItem]) -> Option<PlanSectionView> {
    if items.is_empty() {
        return None;
    }
    let lines = items
        .iter()
        .map(|item| {
            let mut line = item.text.clone();
            if let Some(minutes) = item.time {
                line.push_str(&format!(" ({minutes} min)"));
            }
            if !item.reasons.is_empty() {
                line.push_str(&format!(" - {}", item.reasons.join(", ")));
            }
            line
        })
        .collect();
    Some(PlanSectionView { title, lines })
}

fn plan_total(plan: &DailyPlan) -> Option<String> {
    if plan.is_empty() {
        return None;
    }
    Some(format!(
        "🗓️ Daily plan: {:.1} hours ({} min)",
        plan.total_time_hours, plan.total_time_minutes
    ))
}

fn daily_sections(plan: &DailyPlan) -> Vec<PlanSectionView> {
    [
        plan_section("🌅 Morning focus", &plan.morning_focus),
        plan_section("⚡ Quick wins", &plan.quick_wins),
        plan_section("🌇 Afternoon", &plan.afternoon_tasks),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Project a ranking response into the panel view.
#[must_use]
pub fn project_suggestion(suggestion: &Suggestion) -> SuggestionView {
    let entries: Vec<PlanEntryView> = suggestion
        .ordered_tasks
        .iter()
        .map(|item| PlanEntryView {
            rank: item.rank,
            text: item.text.clone(),
            reasons: reasons_label(&item.reasons),
            color: plan_color(&item.priority),
        })
        .collect();

    let summary = (!entries.is_empty()).then(|| {
        format!(
            "{} pending tasks • {} hours estimated",
            suggestion.total_pending,
            minutes_to_hours(suggestion.total_time_needed)
        )
    });

    SuggestionView {
        headline: format!("💡 {}", suggestion.suggestion),
        summary,
        entries,
        plan_total: suggestion.daily_plan.as_ref().and_then(plan_total),
        sections: suggestion
            .daily_plan
            .as_ref()
            .map(daily_sections)
            .unwrap_or_default(),
        time_recommendation: suggestion.top_time_recommendation.clone(),
    }
}

impl Display for SuggestionView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.headline)?;
        if let Some(summary) = &self.summary {
            write!(f, "\n📊 Your Optimized Task Plan\n{summary}")?;
        }
        for entry in &self.entries {
            write!(
                f,
                "\n{:>3}. {}  <{}>\n     {}",
                entry.rank, entry.text, entry.color, entry.reasons
            )?;
        }
        if let Some(total) = &self.plan_total {
            write!(f, "\n{total}")?;
        }
        for section in &self.sections {
            write!(f, "\n{}", section.title)?;
            for line in &section.lines {
                write!(f, "\n  - {line}")?;
            }
        }
        if let Some(advice) = &self.time_recommendation {
            write!(f, "\n⏰ {advice}")?;
        }
        Ok(())
    }
}

/// Filled stars for `lit` followed by empty stars up to five.
#[must_use]
pub fn star_glyphs(lit: u8) -> String {
    let lit = lit.min(MAX_STARS);
    let mut stars = "★".repeat(usize::from(lit));
    stars.push_str(&"☆".repeat(usize::from(MAX_STARS - lit)));
    stars
}

/// One review as shown in the carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    /// Star glyphs.
    pub stars: String,
    /// Review text or the fallback.
    pub text: String,
    /// Author identifier.
    pub author: String,
}

/// Project a review into its carousel slide.
#[must_use]
pub fn project_review(review: &Review) -> ReviewView {
    let text = review
        .text
        .as_deref()
        .filter(|text| !text.is_empty())
        .unwrap_or("Great app!");
    ReviewView {
        stars: star_glyphs(review.rating.get()),
        text: text.to_owned(),
        author: review.user_email.clone(),
    }
}

impl Display for ReviewView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  \"{}\"  - {}", self.stars, self.text, self.author)
    }
}
