//! Core domain logic for taskdeck.
//! This crate is the single source of truth for task lifecycle invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use config::{CompletionPolicy, ConfigError, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use store::{
    NewTask, StoreError, StoreEvent, StoreResult, StoreSubscription, TaskStore, ToggleOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
