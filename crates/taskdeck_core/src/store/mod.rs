//! The observable task store.
//!
//! # Responsibility
//! - Orchestrate repository calls into the use-case level mutation API.
//! - Notify subscribers of every insert/update/delete so the view layer can
//!   re-render without polling.
//! - Apply the configured completion policy.
//!
//! # Invariants
//! - Every successful mutation emits exactly one `StoreEvent`.
//! - Store APIs never bypass the repository persistence contract.
//! - The store is single-threaded; subscribers drain events on the same
//!   thread that mutates.

use crate::config::{CompletionPolicy, StoreConfig};
use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::{RepoError, TaskRepository};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error: repository failures surfaced as recoverable.
#[derive(Debug)]
pub struct StoreError(pub RepoError);

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self(value)
    }
}

/// Change notification emitted after every successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Inserted(TaskId),
    Updated(TaskId),
    Removed(TaskId),
}

/// Receiving half of the store's change channel.
///
/// Obtained via [`TaskStore::subscribe`]. Consumers observe all subsequent
/// changes without re-querying; pair with [`TaskStore::tasks`] for the
/// current snapshot.
pub struct StoreSubscription {
    receiver: Receiver<StoreEvent>,
}

impl StoreSubscription {
    /// Drains all events delivered since the last call.
    pub fn drain(&self) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}

/// Input for [`TaskStore::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    /// Due moment in Unix epoch milliseconds.
    pub due_at: i64,
}

/// Result of a completion toggle under the active policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The task was completed and removed (`DeleteOnComplete`).
    Removed(Task),
    /// The task remains in the store with its flag flipped.
    Retained(Task),
}

/// Durable, observable collection of task records.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
    config: StoreConfig,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl<R: TaskRepository> TaskStore<R> {
    /// Creates a store over the provided repository with default behavior.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, StoreConfig::default())
    }

    /// Creates a store with explicit behavioral configuration.
    pub fn with_config(repo: R, config: StoreConfig) -> Self {
        Self {
            repo,
            config,
            subscribers: Vec::new(),
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Registers a change observer.
    pub fn subscribe(&mut self) -> StoreSubscription {
        let (sender, receiver) = channel();
        self.subscribers.push(sender);
        StoreSubscription { receiver }
    }

    /// Inserts a new task with a fresh unique identifier.
    ///
    /// Any title and any due date are accepted, including past dates and
    /// empty titles, unless `require_title` is configured.
    pub fn insert(&mut self, new_task: &NewTask) -> StoreResult<Task> {
        let task = Task::new(new_task.title.clone(), new_task.due_at);
        if self.config.require_title {
            task.validate().map_err(RepoError::from)?;
        }

        match self.repo.insert_task(&task) {
            Ok(id) => {
                info!("event=task_insert module=store status=ok id={id}");
                self.notify(StoreEvent::Inserted(id));
                Ok(task)
            }
            Err(err) => {
                error!("event=task_insert module=store status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Flips a task's completion flag and applies the completion policy.
    ///
    /// Under `DeleteOnComplete` (the default), toggling to completed removes
    /// the record immediately; the completed-but-retained state is never
    /// durable. Under `RetainCompleted` the flag persists and toggling again
    /// reactivates the task.
    pub fn toggle_completion(&mut self, id: TaskId) -> StoreResult<ToggleOutcome> {
        let mut task = self
            .repo
            .get_task(id)?
            .ok_or(StoreError(RepoError::NotFound(id)))?;
        task.completed = !task.completed;

        if task.completed && self.config.completion_policy == CompletionPolicy::DeleteOnComplete {
            match self.repo.delete_task(id) {
                Ok(()) => {
                    info!("event=task_complete module=store status=ok id={id} outcome=removed");
                    self.notify(StoreEvent::Removed(id));
                    Ok(ToggleOutcome::Removed(task))
                }
                Err(err) => {
                    error!("event=task_complete module=store status=error id={id} error={err}");
                    Err(err.into())
                }
            }
        } else {
            match self.repo.update_task(&task) {
                Ok(()) => {
                    info!(
                        "event=task_toggle module=store status=ok id={id} completed={}",
                        task.completed
                    );
                    self.notify(StoreEvent::Updated(id));
                    Ok(ToggleOutcome::Retained(task))
                }
                Err(err) => {
                    error!("event=task_toggle module=store status=error id={id} error={err}");
                    Err(err.into())
                }
            }
        }
    }

    /// Removes a task unconditionally by identity.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<()> {
        match self.repo.delete_task(id) {
            Ok(()) => {
                info!("event=task_delete module=store status=ok id={id}");
                self.notify(StoreEvent::Removed(id));
                Ok(())
            }
            Err(err) => {
                error!("event=task_delete module=store status=error id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Returns the current contents in insertion order.
    pub fn tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.repo.list_tasks()?)
    }

    /// Returns the number of records currently in the store.
    pub fn len(&self) -> StoreResult<u64> {
        Ok(self.repo.count_tasks()?)
    }

    /// Returns whether the store holds no records.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.repo.count_tasks()? == 0)
    }

    fn notify(&mut self, event: StoreEvent) {
        // Dropped subscriptions are pruned here rather than on unsubscribe.
        self.subscribers
            .retain(|sender| sender.send(event).is_ok());
    }
}
