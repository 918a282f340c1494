//! Credentialed HTTP+JSON client for the task service.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{ApiFuture, TodoApi};
use crate::config::ClientConfig;
use crate::models::{
    ApiAck, AuthStatus, Credentials, NewReview, NewTask, Review, Suggestion, Task, TaskId,
};
use crate::{AppError, Result};

#[derive(Deserialize)]
struct TaskList {
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct ReviewList {
    #[serde(default)]
    reviews: Vec<Review>,
}

#[derive(Deserialize)]
struct Health {
    #[serde(default)]
    status: String,
}

/// `reqwest` client sharing one cookie jar across all requests.
pub struct HttpApi {
    client: Client,
    jar: Arc<Jar>,
    base: Url,
}

impl HttpApi {
    /// Build a client for `config.base_url`, seeding the jar with the
    /// configured session cookie, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = config.base()?;
        let jar = Arc::new(Jar::default());
        if let Some(cookie) = config.session_cookie.as_deref() {
            jar.add_cookie_str(cookie, &base);
        }

        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| AppError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self { client, jar, base })
    }

    /// Cookies the jar would send to the service, as a `Cookie` header value.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        header.to_str().ok().map(str::to_owned)
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|err| AppError::Config(format!("invalid endpoint {path}: {err}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "GET");
        let response = self.client.get(self.url(path)?).send().await?;
        decode_json(response).await
    }
}

impl TodoApi for HttpApi {
    fn check_auth(&self) -> ApiFuture<'_, AuthStatus> {
        Box::pin(async move {
            match self.get_json::<AuthStatus>("/check-auth").await {
                // Some deployments answer 401 instead of `authenticated: false`.
                Err(AppError::Unauthorized(_)) => Ok(AuthStatus::default()),
                other => other,
            }
        })
    }

    fn register(&self, credentials: Credentials) -> ApiFuture<'_, ApiAck> {
        Box::pin(async move {
            debug!(email = %credentials.email, "POST /register");
            let response = self
                .client
                .post(self.url("/register")?)
                .json(&credentials)
                .send()
                .await?;
            decode_ack(response).await
        })
    }

    fn login(&self, credentials: Credentials) -> ApiFuture<'_, ApiAck> {
        Box::pin(async move {
            debug!(email = %credentials.email, "POST /login");
            let response = self
                .client
                .post(self.url("/login")?)
                .json(&credentials)
                .send()
                .await?;
            decode_ack(response).await
        })
    }

    fn logout(&self) -> ApiFuture<'_, ApiAck> {
        Box::pin(async move {
            debug!("POST /logout");
            let response = self.client.post(self.url("/logout")?).send().await?;
            decode_ack(response).await
        })
    }

    fn list_tasks(&self) -> ApiFuture<'_, Vec<Task>> {
        Box::pin(async move {
            let list: TaskList = self.get_json("/tasks").await?;
            Ok(list.tasks)
        })
    }

    fn add_task(&self, task: NewTask) -> ApiFuture<'_, ApiAck> {
        Box::pin(async move {
            debug!("POST /add-task");
            let response = self
                .client
                .post(self.url("/add-task")?)
                .json(&task)
                .send()
                .await?;
            decode_ack(response).await
        })
    }

    fn toggle_complete(&self, id: TaskId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            debug!(task_id = id, "PUT /task/{{id}}/complete");
            let response = self
                .client
                .put(self.url(&format!("/task/{id}/complete"))?)
                .send()
                .await?;
            expect_success(response).await
        })
    }

    fn delete_task(&self, id: TaskId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            debug!(task_id = id, "DELETE /task/{{id}}");
            let response = self
                .client
                .delete(self.url(&format!("/task/{id}"))?)
                .send()
                .await?;
            expect_success(response).await
        })
    }

    fn suggest(&self) -> ApiFuture<'_, Suggestion> {
        Box::pin(async move {
            debug!("POST /suggest");
            let response = self
                .client
                .post(self.url("/suggest")?)
                .json(&serde_json::json!({}))
                .send()
                .await?;
            decode_json(response).await
        })
    }

    fn list_reviews(&self) -> ApiFuture<'_, Vec<Review>> {
        Box::pin(async move {
            let list: ReviewList = self.get_json("/reviews").await?;
            Ok(list.reviews)
        })
    }

    fn add_review(&self, review: NewReview) -> ApiFuture<'_, ApiAck> {
        Box::pin(async move {
            debug!(rating = review.rating.get(), "POST /add-review");
            let response = self
                .client
                .post(self.url("/add-review")?)
                .json(&review)
                .send()
                .await?;
            decode_ack(response).await
        })
    }

    fn health(&self) -> ApiFuture<'_, String> {
        Box::pin(async move {
            let response = self.client.get(self.url("/health")?).send().await?;
            let status = response.status();
            // An unhealthy service still reports its status in the body.
            let body = response.text().await?;
            match serde_json::from_str::<Health>(&body) {
                Ok(health) => Ok(health.status),
                Err(_) if status.is_success() => Ok("healthy".into()),
                Err(_) => Err(status_error(status, String::new())),
            }
        })
    }
}

/// Map a non-success status to the matching error variant. `message` stays
/// empty unless the server sent one.
fn status_error(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::UNAUTHORIZED {
        return AppError::Unauthorized(message);
    }
    AppError::Remote {
        status: status.as_u16(),
        message,
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "request rejected");
        return Err(status_error(status, String::new()));
    }
    Ok(response.json::<T>().await?)
}

/// Decode a `{success, message}` body, which the service sends on both
/// success and rejection.
async fn decode_ack(response: Response) -> Result<ApiAck> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str::<ApiAck>(&body) {
        Ok(ack) if status.is_success() && ack.success => Ok(ack),
        Ok(ack) if status.is_success() => Err(AppError::Remote {
            status: status.as_u16(),
            message: ack.message,
        }),
        Ok(ack) => Err(status_error(status, ack.message)),
        Err(err) if status.is_success() => Err(AppError::Decode(err.to_string())),
        Err(_) => Err(status_error(status, String::new())),
    }
}

async fn expect_success(response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiAck>(&body)
        .map(|ack| ack.message)
        .unwrap_or_default();
    warn!(status = status.as_u16(), %message, "request rejected");
    Err(status_error(status, message))
}
