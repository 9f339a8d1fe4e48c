//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record stored and rendered by taskdeck.
//! - Provide constructors and optional title validation.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `completed` starts as `false` for every freshly created task.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Validation failures for task input.
///
/// Enforcement is opt-in: the store only calls `Task::validate` when
/// `StoreConfig::require_title` is set, preserving the default
/// accept-anything behavior (empty titles and past due dates included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// A single to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID used for selection and deletion targeting.
    pub id: TaskId,
    /// User-supplied title. May be empty.
    pub title: String,
    /// Due moment in Unix epoch milliseconds.
    pub due_at: i64,
    /// Completion flag. Whether a completed task survives in the store is
    /// decided by the configured completion policy, not by this model.
    pub completed: bool,
}

impl Task {
    /// Creates a new task with a generated stable ID and `completed = false`.
    pub fn new(title: impl Into<String>, due_at: i64) -> Self {
        Self::with_id(Uuid::new_v4(), title, due_at)
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(id: TaskId, title: impl Into<String>, due_at: i64) -> Self {
        Self {
            id,
            title: title.into(),
            due_at,
            completed: false,
        }
    }

    /// Checks the opt-in input constraints.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}
