/// Civic Service Library
///
/// Form intake, posts and reels with like toggles, reports, comments, shares
/// and news for the Civic Sense platform. Records live in flat JSON files;
/// every mutation runs under a per-file lock.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `domain`: Records and request bodies
/// - `services`: Business logic, including the like counter
/// - `repository`: JSON record files, locked updates and the user registry
/// - `state`: Service wiring shared by all workers
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
