//! Optimistic create, toggle, and delete flows against the fake service.

use std::sync::Arc;
use std::time::Duration;

use taskdeck::controller::{BUSY_MESSAGE, DELETE_PROMPT};
use taskdeck::models::NewTask;
use taskdeck::AppError;

use super::test_helpers::{loaded_controller, task, FakeApi, RecordingUi};

/// Wait until the fake has seen `count` calls to `endpoint`.
async fn until_called(api: &FakeApi, endpoint: &str, count: usize) {
    for _ in 0..200 {
        if api.calls(endpoint) >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("{endpoint} was not called {count} times");
}

#[tokio::test]
async fn blank_add_alerts_without_mutation_or_request() {
    let api = FakeApi::with_tasks(vec![task(1, "Existing", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;
    let renders = ui.task_renders();

    let result = controller.add_task(NewTask::new("   ")).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(ui.alerts(), vec!["Please enter a task!".to_owned()]);
    assert_eq!(api.calls("add_task"), 0);
    assert_eq!(ui.task_renders(), renders);
    assert_eq!(controller.tasks().await.len(), 1);
}

#[tokio::test]
async fn add_shows_placeholder_then_reloads_server_row() {
    let api = FakeApi::with_tasks(vec![task(1, "Existing", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;

    let held = api.gate.lock().await;
    let worker = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.add_task(NewTask::new("Buy milk")).await })
    };
    until_called(&api, "add_task", 1).await;

    let optimistic = ui.last_tasks();
    assert_eq!(optimistic.items.len(), 2);
    assert_eq!(optimistic.items[1].id, -1);
    assert_eq!(optimistic.items[1].text, "Buy milk");
    assert_eq!(optimistic.stats.pending, 2);

    drop(held);
    worker.await.expect("join").expect("add succeeds");

    let ids: Vec<i64> = controller.tasks().await.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(ui.alerts().is_empty());
}

#[tokio::test]
async fn rejected_add_restores_list_and_alerts_server_message() {
    let api = FakeApi::with_tasks(vec![task(1, "Existing", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;
    let before = controller.tasks().await;
    api.fail("add_task", 400, "Task text too long");

    let result = controller.add_task(NewTask::new("x".repeat(10).as_str())).await;

    assert!(matches!(result, Err(AppError::Remote { status: 400, .. })));
    assert_eq!(controller.tasks().await, before);
    assert_eq!(ui.last_tasks().items.len(), 1);
    assert_eq!(
        ui.alerts(),
        vec!["Error adding task: Task text too long".to_owned()]
    );
}

#[tokio::test]
async fn add_failure_without_message_uses_generic_alert() {
    let api = FakeApi::with_tasks(vec![]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;
    api.fail("add_task", 401, "");

    assert!(controller.add_task(NewTask::new("a")).await.is_err());
    assert_eq!(
        ui.alerts(),
        vec!["Failed to add task. Please try again.".to_owned()]
    );
    assert!(controller.tasks().await.is_empty());
}

#[tokio::test]
async fn toggle_flips_and_reloads() {
    let api = FakeApi::with_tasks(vec![task(1, "Read", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;

    controller.toggle_complete(1).await.expect("toggle succeeds");

    assert!(controller.tasks().await[0].completed);
    assert_eq!(api.calls("list_tasks"), 2);
    let view = ui.last_tasks();
    assert_eq!(view.items[0].toggle_label, "↺ Undo");
    assert_eq!(view.stats.completed, 1);
}

#[tokio::test]
async fn double_toggle_returns_to_original_state() {
    let api = FakeApi::with_tasks(vec![task(1, "Read", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;

    controller.toggle_complete(1).await.expect("first toggle");
    controller.toggle_complete(1).await.expect("second toggle");

    assert!(!controller.tasks().await[0].completed);
    assert_eq!(api.calls("toggle_complete"), 2);
}

#[tokio::test]
async fn rejected_toggle_is_undone() {
    let api = FakeApi::with_tasks(vec![task(1, "Read", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;
    api.fail("toggle_complete", 500, "");

    assert!(controller.toggle_complete(1).await.is_err());
    assert!(!controller.tasks().await[0].completed);
    assert!(!ui.last_tasks().items[0].completed);
    assert_eq!(
        ui.alerts(),
        vec!["Failed to update task. Please try again.".to_owned()]
    );
}

#[tokio::test]
async fn toggle_of_unknown_id_is_ignored() {
    let api = FakeApi::with_tasks(vec![task(1, "Read", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;

    controller.toggle_complete(42).await.expect("no-op");
    assert_eq!(api.calls("toggle_complete"), 0);
    assert!(ui.alerts().is_empty());
}

#[tokio::test]
async fn second_change_while_in_flight_is_refused() {
    let api = FakeApi::with_tasks(vec![task(1, "Read", false), task(2, "Write", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;

    let held = api.gate.lock().await;
    let worker = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.toggle_complete(1).await })
    };
    until_called(&api, "toggle_complete", 1).await;

    let again = controller.toggle_complete(1).await;
    assert!(matches!(again, Err(AppError::Busy(_))));
    let delete = controller.delete_task(1).await;
    assert!(matches!(delete, Err(AppError::Busy(_))));
    assert_eq!(
        ui.alerts(),
        vec![BUSY_MESSAGE.to_owned(), BUSY_MESSAGE.to_owned()]
    );
    assert_eq!(api.calls("toggle_complete"), 1);
    assert_eq!(api.calls("delete_task"), 0);

    drop(held);
    worker.await.expect("join").expect("toggle succeeds");
    assert!(controller.tasks().await[0].completed);
}

#[tokio::test]
async fn reload_during_flight_is_dropped() {
    let api = FakeApi::with_tasks(vec![task(1, "Read", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;

    let held = api.gate.lock().await;
    let worker = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.toggle_complete(1).await })
    };
    until_called(&api, "toggle_complete", 1).await;

    // The server has not flipped yet; a reload now would undo the optimistic flip.
    controller.reload().await.expect("reload");
    assert!(controller.tasks().await[0].completed);

    drop(held);
    worker.await.expect("join").expect("toggle succeeds");
}

#[tokio::test]
async fn reload_fetched_before_a_toggle_cannot_undo_it() {
    let api = FakeApi::with_tasks(vec![task(1, "Read", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;

    let release = api.hold_next_list();
    let background = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.reload().await })
    };
    until_called(&api, "list_tasks", 2).await;

    controller.toggle_complete(1).await.expect("toggle");
    assert!(controller.tasks().await[0].completed);

    release.send(()).expect("reload still waiting");
    background.await.expect("join").expect("reload");

    assert!(controller.tasks().await[0].completed);
    assert!(ui.last_tasks().items[0].completed);
}

#[tokio::test]
async fn confirmed_delete_removes_task() {
    let api = FakeApi::with_tasks(vec![task(1, "a", false), task(2, "b", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;

    controller.delete_task(1).await.expect("delete succeeds");

    assert_eq!(
        ui.prompts.lock().expect("lock").clone(),
        vec![DELETE_PROMPT.to_owned()]
    );
    assert_eq!(api.task_ids(), vec![2]);
    assert_eq!(ui.last_tasks().items.len(), 1);
}

#[tokio::test]
async fn declined_delete_changes_nothing() {
    let api = FakeApi::with_tasks(vec![task(1, "a", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;
    ui.set_decline(true);

    controller.delete_task(1).await.expect("declined");

    assert_eq!(api.calls("delete_task"), 0);
    assert_eq!(controller.tasks().await.len(), 1);
}

#[tokio::test]
async fn rejected_delete_puts_task_back_in_place() {
    let api = FakeApi::with_tasks(vec![
        task(1, "a", false),
        task(2, "b", true),
        task(3, "c", false),
    ]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;
    api.fail("delete_task", 404, "Task not found");

    assert!(controller.delete_task(2).await.is_err());

    let ids: Vec<i64> = controller.tasks().await.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    let stats = controller.stats().await;
    assert_eq!((stats.total, stats.completed, stats.pending), (3, 1, 2));
    assert_eq!(
        ui.alerts(),
        vec!["Failed to delete task. Please try again.".to_owned()]
    );
}

#[tokio::test]
async fn failed_reload_keeps_previous_list() {
    let api = FakeApi::with_tasks(vec![task(1, "a", false)]);
    let ui = RecordingUi::new();
    let controller = loaded_controller(&api, &ui).await;
    api.fail("list_tasks", 500, "");

    assert!(controller.reload().await.is_err());
    assert_eq!(controller.tasks().await.len(), 1);

    api.recover("list_tasks");
    controller.reload().await.expect("reload");
}
