//! `HttpApi` against an in-process axum service on an ephemeral port.
//!
//! The service mimics the real endpoints: cookie-based sessions, the
//! `{success, message}` acknowledgement body, and error statuses.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use taskdeck::api::http::HttpApi;
use taskdeck::api::TodoApi;
use taskdeck::config::ClientConfig;
use taskdeck::models::{Credentials, NewReview, NewTask, Priority, Rating};
use taskdeck::AppError;

#[derive(Default)]
struct Service {
    tasks: Mutex<Vec<Value>>,
    healthy: Mutex<bool>,
    accounts: Mutex<Vec<String>>,
}

type Shared = Arc<Service>;

fn signed_in(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookie| cookie.contains("session=abc"))
}

fn denied() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "login required"}))).into_response()
}

async fn register(State(service): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    if email.is_empty() || body["password"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Email and password required"})),
        )
            .into_response();
    }
    let mut accounts = service.accounts.lock().expect("lock");
    if accounts.contains(&email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Email already registered"})),
        )
            .into_response();
    }
    accounts.push(email);
    Json(json!({"success": true, "message": "Registration successful! Please login."}))
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        (
            [(header::SET_COOKIE, "session=abc; Path=/")],
            Json(json!({"success": true, "message": "Login successful", "email": body["email"]})),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid email or password"})),
        )
            .into_response()
    }
}

async fn check_auth(headers: HeaderMap) -> Json<Value> {
    if signed_in(&headers) {
        Json(json!({"authenticated": true, "email": "me@example.com", "is_admin": false}))
    } else {
        Json(json!({"authenticated": false}))
    }
}

async fn tasks(State(service): State<Shared>, headers: HeaderMap) -> Response {
    if !signed_in(&headers) {
        return denied();
    }
    let tasks = service.tasks.lock().expect("lock").clone();
    Json(json!({ "tasks": tasks })).into_response()
}

async fn add_task(
    State(service): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !signed_in(&headers) {
        return denied();
    }
    if body["text"] == "crash" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/html")],
            "<html><body>Internal Server Error</body></html>",
        )
            .into_response();
    }
    if body["text"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Task text required"})),
        )
            .into_response();
    }
    let mut tasks = service.tasks.lock().expect("lock");
    let mut row = body.clone();
    row["id"] = json!(tasks.len() + 1);
    row["completed"] = json!(false);
    tasks.push(row.clone());
    Json(json!({"success": true, "task": row})).into_response()
}

async fn complete(State(service): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut tasks = service.tasks.lock().expect("lock");
    match tasks.iter_mut().find(|task| task["id"] == id) {
        Some(task) => {
            let done = task["completed"].as_bool().unwrap_or_default();
            task["completed"] = json!(!done);
            Json(json!({"success": true, "completed": !done})).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Task not found"})),
        )
            .into_response(),
    }
}

async fn delete(State(service): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut tasks = service.tasks.lock().expect("lock");
    let before = tasks.len();
    tasks.retain(|task| task["id"] != id);
    if tasks.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Task not found"})),
        )
            .into_response();
    }
    Json(json!({"success": true, "message": "Task deleted"})).into_response()
}

async fn suggest() -> Json<Value> {
    Json(json!({
        "suggestion": "Focus on the report",
        "ordered_tasks": [{"rank": 1, "text": "Report", "priority": "high", "reasons": ["Due soon"]}],
        "total_pending": 1,
        "total_time_needed": 45
    }))
}

async fn reviews() -> Json<Value> {
    Json(json!({"reviews": [{"rating": 5, "text": "Love it", "user_email": "a***@example.com"}]}))
}

async fn add_review(Json(body): Json<Value>) -> Response {
    if body["text"] == "again" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "You've already submitted a review"})),
        )
            .into_response();
    }
    Json(json!({"success": true, "message": "Thank you for your review!"})).into_response()
}

async fn health(State(service): State<Shared>) -> Response {
    if *service.healthy.lock().expect("lock") {
        Json(json!({"status": "healthy", "database": "connected"})).into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "unhealthy", "database": "disconnected"})),
        )
            .into_response()
    }
}

/// Start the fake service and return its origin.
async fn spawn_service(service: Shared) -> String {
    let router = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/check-auth", get(check_auth))
        .route("/tasks", get(tasks))
        .route("/add-task", post(add_task))
        .route("/task/{id}/complete", put(complete))
        .route("/task/{id}", axum::routing::delete(delete))
        .route("/suggest", post(suggest))
        .route("/reviews", get(reviews))
        .route("/add-review", post(add_review))
        .route("/health", get(health))
        .with_state(service);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn client(service: &Shared) -> HttpApi {
    let origin = spawn_service(Arc::clone(service)).await;
    let config = ClientConfig::from_toml_str(&format!("base_url = \"{origin}\"\n"))
        .expect("valid config");
    HttpApi::new(&config).expect("client builds")
}

async fn signed_in_client(service: &Shared) -> HttpApi {
    let api = client(service).await;
    api.login(Credentials {
        email: "me@example.com".into(),
        password: "secret".into(),
    })
    .await
    .expect("login");
    api
}

#[tokio::test]
async fn session_cookie_is_kept_after_login() {
    let service = Shared::default();
    let api = client(&service).await;

    assert!(!api.check_auth().await.expect("check").authenticated);
    let err = api.list_tasks().await.expect_err("signed out");
    assert!(matches!(err, AppError::Unauthorized(_)));
    assert_eq!(err.remote_message(), None);
    assert_eq!(err.to_string(), "unauthorized: session expired");

    let ack = api
        .login(Credentials {
            email: "me@example.com".into(),
            password: "secret".into(),
        })
        .await
        .expect("login");
    assert_eq!(ack.message, "Login successful");

    let status = api.check_auth().await.expect("check");
    assert!(status.authenticated);
    assert_eq!(status.email.as_deref(), Some("me@example.com"));
    assert!(api.list_tasks().await.expect("tasks").is_empty());
    assert!(api
        .session_cookie()
        .expect("cookie stored")
        .contains("session=abc"));
}

#[tokio::test]
async fn rejected_login_carries_server_message() {
    let service = Shared::default();
    let api = client(&service).await;

    let err = api
        .login(Credentials {
            email: "me@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .expect_err("rejected");
    assert_eq!(err.remote_message(), Some("Invalid email or password"));
}

#[tokio::test]
async fn registration_round_trip() {
    let service = Shared::default();
    let api = client(&service).await;
    let credentials = Credentials {
        email: "new@example.com".into(),
        password: "secret".into(),
    };

    let ack = api.register(credentials.clone()).await.expect("register");
    assert_eq!(ack.message, "Registration successful! Please login.");
    assert_eq!(
        *service.accounts.lock().expect("lock"),
        vec!["new@example.com".to_owned()]
    );
    assert!(!api.check_auth().await.expect("check").authenticated);

    let err = api.register(credentials).await.expect_err("duplicate");
    assert!(matches!(err, AppError::Remote { status: 400, .. }));
    assert_eq!(err.remote_message(), Some("Email already registered"));
}

#[tokio::test]
async fn configured_cookie_seeds_the_jar() {
    let service = Shared::default();
    let origin = spawn_service(Arc::clone(&service)).await;
    let mut config = ClientConfig::from_toml_str(&format!("base_url = \"{origin}\"\n"))
        .expect("valid config");
    config.session_cookie = Some("session=abc".into());
    let api = HttpApi::new(&config).expect("client builds");

    assert!(api.check_auth().await.expect("check").authenticated);
}

#[tokio::test]
async fn task_round_trip() {
    let service = Shared::default();
    let api = signed_in_client(&service).await;

    api.add_task(NewTask::new("Report").with_priority(Priority::High))
        .await
        .expect("add");
    let listed = api.list_tasks().await.expect("tasks");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, 1);
    assert_eq!(listed[0].priority, Priority::High);

    api.toggle_complete(1).await.expect("toggle");
    assert!(api.list_tasks().await.expect("tasks")[0].completed);

    api.delete_task(1).await.expect("delete");
    assert!(api.list_tasks().await.expect("tasks").is_empty());
}

#[tokio::test]
async fn rejected_writes_map_to_remote_errors() {
    let service = Shared::default();
    let api = signed_in_client(&service).await;

    let err = api.add_task(NewTask::new("")).await.expect_err("rejected");
    assert!(matches!(err, AppError::Remote { status: 400, .. }));
    assert_eq!(err.remote_message(), Some("Task text required"));

    let err = api.add_task(NewTask::new("crash")).await.expect_err("server error");
    assert!(matches!(err, AppError::Remote { status: 500, .. }));
    assert_eq!(err.remote_message(), None);
    assert_eq!(err.to_string(), "remote: 500 Internal Server Error");

    let err = api.toggle_complete(99).await.expect_err("missing");
    assert!(matches!(err, AppError::Remote { status: 404, .. }));
    assert!(api.delete_task(99).await.is_err());
}

#[tokio::test]
async fn suggestion_and_reviews_decode() {
    let service = Shared::default();
    let api = signed_in_client(&service).await;

    let suggestion = api.suggest().await.expect("suggest");
    assert_eq!(suggestion.ordered_tasks[0].text, "Report");
    assert_eq!(suggestion.total_time_needed, 45);

    let reviews = api.list_reviews().await.expect("reviews");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].rating.get(), 5);

    let rating = Rating::try_from(4_u8).expect("valid");
    let ack = api
        .add_review(NewReview::new(rating, "fine"))
        .await
        .expect("review");
    assert_eq!(ack.message, "Thank you for your review!");
    let err = api
        .add_review(NewReview::new(rating, "again"))
        .await
        .expect_err("duplicate");
    assert_eq!(err.remote_message(), Some("You've already submitted a review"));
}

#[tokio::test]
async fn health_reports_status_on_any_code() {
    let service = Shared::default();
    let api = client(&service).await;

    assert_eq!(api.health().await.expect("health"), "unhealthy");
    *service.healthy.lock().expect("lock") = true;
    assert_eq!(api.health().await.expect("health"), "healthy");
}

#[tokio::test]
async fn unreachable_service_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let config = ClientConfig::from_toml_str(&format!(
        "base_url = \"http://{addr}\"\nrequest_timeout_seconds = 2\n"
    ))
    .expect("valid config");
    let api = HttpApi::new(&config).expect("client builds");

    assert!(matches!(api.list_tasks().await, Err(AppError::Http(_))));
}
