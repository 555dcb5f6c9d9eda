/// UGC Service Library
///
/// Handles user-generated content for the film platform: likes, reviews and
/// bookmarks, exposed as a REST API and stored in MongoDB.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route wiring
/// - `models`: UGC records and aggregate response models
/// - `services`: business logic layer (generic UGC service, rating fan-out)
/// - `db`: document store abstraction and the MongoDB implementation
/// - `error`: error types and HTTP mapping
/// - `config`: configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
