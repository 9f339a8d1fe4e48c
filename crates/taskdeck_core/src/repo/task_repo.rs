//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `tasks` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Read paths reject invalid persisted state instead of masking it.
//! - `list_tasks` returns rows in insertion order (`seq ASC`).

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::task::{Task, TaskId, TaskValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    due_at,
    is_completed
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
    /// The connection has not been migrated by `open_db`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} has not been migrated to {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn insert_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    fn count_tasks(&self) -> RepoResult<u64>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is zero.
    /// - `MissingRequiredTable` when the `tasks` table does not exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version == 0 {
            return Err(RepoError::UninitializedConnection {
                expected_version: latest_version(),
                actual_version,
            });
        }

        let tasks_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'tasks'
            );",
            [],
            |row| row.get(0),
        )?;
        if tasks_exists == 0 {
            return Err(RepoError::MissingRequiredTable("tasks"));
        }

        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, task: &Task) -> RepoResult<TaskId> {
        self.conn.execute(
            "INSERT INTO tasks (uuid, title, due_at, is_completed)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.due_at,
                bool_to_int(task.completed),
            ],
        )?;

        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET title = ?1, due_at = ?2, is_completed = ?3
             WHERE uuid = ?4;",
            params![
                task.title.as_str(),
                task.due_at,
                bool_to_int(task.completed),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY seq ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count_tasks(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    let completed = match row.get::<_, i64>("is_completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_completed value `{other}` in tasks.is_completed"
            )));
        }
    };

    Ok(Task {
        id,
        title: row.get("title")?,
        due_at: row.get("due_at")?,
        completed,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
