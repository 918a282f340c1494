#![forbid(unsafe_code)]

//! `taskdeck`: client for a session-authenticated task service with
//! optimistic updates, a suggested daily plan, and a review carousel.

pub mod api;
pub mod app;
pub mod commands;
pub mod config;
pub mod controller;
pub mod errors;
pub mod models;
pub mod render;
pub mod reviews;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod suggest;
pub mod terminal;
pub mod ui;

pub use config::ClientConfig;
pub use errors::{AppError, Result};
