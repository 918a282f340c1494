//! Wire-format tests for the task service payloads.

use chrono::NaiveDate;
use serde_json::json;
use taskdeck::models::{
    ApiAck, AuthStatus, Category, NewReview, NewTask, Priority, Rating, Review, Suggestion, Task,
};
use taskdeck::AppError;

#[test]
fn task_decodes_full_server_row() {
    let raw = json!({
        "id": 7,
        "text": "File taxes",
        "priority": "urgent",
        "category": "finance",
        "due_date": "2026-10-21",
        "estimated_time": 90,
        "importance": 5,
        "completed": false,
        "created_at": "2026-10-01T09:00:00"
    });
    let task: Task = serde_json::from_value(raw).expect("task decodes");
    assert_eq!(task.id, 7);
    assert_eq!(task.priority, Priority::Urgent);
    assert_eq!(task.category, Category::Finance);
    assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 10, 21));
    assert_eq!(task.estimated_time, 90);
    assert!(!task.is_provisional());
}

#[test]
fn task_defaults_missing_metadata() {
    let task: Task =
        serde_json::from_value(json!({"id": 1, "text": "Water plants"})).expect("task decodes");
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.category, Category::General);
    assert_eq!(task.due_date, None);
    assert_eq!(task.estimated_time, 30);
    assert_eq!(task.importance, 3);
    assert!(!task.completed);
}

#[test]
fn task_nulls_decode_as_defaults() {
    let raw = json!({
        "id": 3,
        "text": "Sparse row",
        "priority": null,
        "category": null,
        "due_date": null,
        "estimated_time": null,
        "importance": null,
        "completed": null,
        "created_at": null
    });
    let task: Task = serde_json::from_value(raw).expect("task decodes");
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.category, Category::General);
    assert_eq!(task.due_date, None);
    assert_eq!(task.estimated_time, 30);
    assert_eq!(task.importance, 3);
    assert!(!task.completed);
}

#[test]
fn unknown_priority_falls_back_to_medium() {
    let task: Task = serde_json::from_value(json!({"id": 4, "text": "x", "priority": "critical"}))
        .expect("task decodes");
    assert_eq!(task.priority, Priority::Medium);

    let task: Task = serde_json::from_value(json!({"id": 5, "text": "x", "priority": "HIGH"}))
        .expect("task decodes");
    assert_eq!(task.priority, Priority::High);
}

#[test]
fn malformed_due_dates_mean_no_due_date() {
    for due in [json!(""), json!("next week"), json!("2026-13-40"), json!(20261019)] {
        let task: Task = serde_json::from_value(json!({"id": 6, "text": "x", "due_date": due}))
            .expect("task decodes");
        assert_eq!(task.due_date, None, "due_date {due}");
    }
}

#[test]
fn one_sparse_row_does_not_fail_the_list() {
    let raw = r#"[
        {"id": 1, "text": "Fine", "priority": "low"},
        {"id": 2, "text": "Sparse", "estimated_time": null, "category": null, "due_date": ""}
    ]"#;
    let tasks: Vec<Task> = serde_json::from_str(raw).expect("list decodes");
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1].estimated_time, 30);
}

#[test]
fn unknown_category_round_trips_verbatim() {
    let task: Task = serde_json::from_value(json!({"id": 2, "text": "x", "category": "garden"}))
        .expect("task decodes");
    assert_eq!(task.category, Category::Other("garden".into()));
    let encoded = serde_json::to_value(&task).expect("task encodes");
    assert_eq!(encoded["category"], "garden");
}

#[test]
fn new_task_serializes_create_payload() {
    let payload = NewTask::new("  Call mom  ")
        .with_priority(Priority::High)
        .with_category(Category::Personal)
        .with_due_date(NaiveDate::from_ymd_opt(2026, 10, 20))
        .with_estimated_time(15);
    let encoded = serde_json::to_value(&payload).expect("payload encodes");
    assert_eq!(
        encoded,
        json!({
            "text": "Call mom",
            "priority": "high",
            "category": "personal",
            "due_date": "2026-10-20",
            "estimated_time": 15,
            "importance": 3
        })
    );
}

#[test]
fn new_task_validation() {
    assert!(NewTask::new("Buy milk").validate().is_ok());
    let blank = NewTask::new("   ").validate();
    assert!(matches!(blank, Err(AppError::Validation(msg)) if msg == "Please enter a task!"));
    assert!(NewTask::new("x").with_estimated_time(0).validate().is_err());
}

#[test]
fn priority_and_category_parse_case_insensitively() {
    assert_eq!("HIGH".parse::<Priority>().expect("parses"), Priority::High);
    assert!("soon".parse::<Priority>().is_err());
    assert_eq!("Work".parse::<Category>().expect("parses"), Category::Work);
    assert_eq!(
        "Errands".parse::<Category>().expect("parses"),
        Category::Other("errands".into())
    );
    assert!(" ".parse::<Category>().is_err());
}

#[test]
fn rating_rejects_out_of_range_values() {
    assert!(Rating::try_from(0_u8).is_err());
    assert!(Rating::try_from(6_u8).is_err());
    assert_eq!(Rating::try_from(5_u8).expect("valid").get(), 5);

    let bad = serde_json::from_value::<Review>(json!({"rating": 9, "user_email": "a***@x.com"}));
    assert!(bad.is_err());
}

#[test]
fn review_payloads() {
    let review: Review = serde_json::from_value(json!({
        "id": 3,
        "rating": 4,
        "text": "Handy",
        "user_email": "j***@example.com",
        "created_at": "2026-10-02"
    }))
    .expect("review decodes");
    assert_eq!(review.rating.get(), 4);
    assert_eq!(review.text.as_deref(), Some("Handy"));

    let submission = NewReview::new(Rating::try_from(5_u8).expect("valid"), "  Love it ");
    assert_eq!(
        serde_json::to_value(&submission).expect("encodes"),
        json!({"rating": 5, "text": "Love it"})
    );
}

#[test]
fn auth_and_ack_tolerate_missing_fields() {
    let status: AuthStatus = serde_json::from_value(json!({})).expect("decodes");
    assert!(!status.authenticated);
    assert!(!status.is_admin);

    let ack: ApiAck = serde_json::from_value(json!({"success": true})).expect("decodes");
    assert!(ack.success);
    assert!(ack.message.is_empty());
}

#[test]
fn suggestion_decodes_ranking_response() {
    let suggestion: Suggestion = serde_json::from_value(json!({
        "suggestion": "Start with the overdue report",
        "ordered_tasks": [
            {"rank": 1, "text": "Report", "priority": "urgent", "reasons": ["Overdue"], "score": 98.5},
            {"rank": 2, "text": "Gym", "priority": "low", "reasons": []}
        ],
        "total_pending": 2,
        "total_time_needed": 150,
        "daily_plan": {
            "total_time_minutes": 150,
            "total_time_hours": 2.5,
            "morning_focus": [{"text": "Report", "time": 120, "reasons": ["Overdue"]}],
            "quick_wins": [],
            "afternoon_tasks": [{"text": "Gym", "time": 30}]
        },
        "top_time_recommendation": "Tackle this first thing"
    }))
    .expect("suggestion decodes");
    assert_eq!(suggestion.ordered_tasks.len(), 2);
    assert_eq!(suggestion.ordered_tasks[0].rank, 1);
    let plan = suggestion.daily_plan.expect("plan present");
    assert!(!plan.is_empty());
    assert_eq!(plan.afternoon_tasks[0].time, Some(30));
}
