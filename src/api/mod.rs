//! Remote task service abstraction.
//!
//! The [`TodoApi`] trait decouples the client core (store, mutation
//! controller, panels) from the transport. [`http::HttpApi`] talks to the
//! real service over credentialed HTTP+JSON; tests substitute an in-memory
//! implementation.

pub mod http;

use std::future::Future;
use std::pin::Pin;

use crate::models::{
    ApiAck, AuthStatus, Credentials, NewReview, NewTask, Review, Suggestion, Task, TaskId,
};
use crate::Result;

/// Boxed future returned by [`TodoApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Endpoints of the task service consumed by this client.
///
/// Write operations resolve to `Ok` only when the service accepted the
/// request; a non-success status or a `success: false` body is an
/// [`AppError::Remote`](crate::AppError::Remote).
pub trait TodoApi: Send + Sync {
    /// `GET /check-auth`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` on transport failure.
    fn check_auth(&self) -> ApiFuture<'_, AuthStatus>;

    /// `POST /register`; the new account still has to log in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Remote` carrying the server message when the
    /// account is rejected, e.g. because the email is taken.
    fn register(&self, credentials: Credentials) -> ApiFuture<'_, ApiAck>;

    /// `POST /login`; on success the session cookie is retained.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Remote` carrying the server message when the
    /// credentials are rejected.
    fn login(&self, credentials: Credentials) -> ApiFuture<'_, ApiAck>;

    /// `POST /logout`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` or `AppError::Remote` on failure.
    fn logout(&self) -> ApiFuture<'_, ApiAck>;

    /// `GET /tasks`, in server order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` when the session expired.
    fn list_tasks(&self) -> ApiFuture<'_, Vec<Task>>;

    /// `POST /add-task`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Remote` with the server message on rejection.
    fn add_task(&self, task: NewTask) -> ApiFuture<'_, ApiAck>;

    /// `PUT /task/{id}/complete`, flipping completion server-side.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Remote` on a non-success status.
    fn toggle_complete(&self, id: TaskId) -> ApiFuture<'_, ()>;

    /// `DELETE /task/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Remote` on a non-success status.
    fn delete_task(&self, id: TaskId) -> ApiFuture<'_, ()>;

    /// `POST /suggest`; the server ranks the session's pending tasks.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` or `AppError::Decode` on failure.
    fn suggest(&self) -> ApiFuture<'_, Suggestion>;

    /// `GET /reviews`; no session required.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` or `AppError::Decode` on failure.
    fn list_reviews(&self) -> ApiFuture<'_, Vec<Review>>;

    /// `POST /add-review`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Remote` with the server message on rejection.
    fn add_review(&self, review: NewReview) -> ApiFuture<'_, ApiAck>;

    /// `GET /health`, returning the reported status string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` when the service is unreachable.
    fn health(&self) -> ApiFuture<'_, String>;
}
