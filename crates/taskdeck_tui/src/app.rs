//! Application state for the single-screen task list.
//!
//! The view keeps a snapshot of the store's contents and refreshes it
//! whenever the store's change channel delivers an event, so the rendered
//! list always reflects current store state without manual refresh.

use chrono::{Local, NaiveDateTime, TimeZone};
use std::time::{Duration, Instant};
use taskdeck_core::{
    CompletionPolicy, NewTask, StoreSubscription, Task, TaskId, TaskRepository, TaskStore,
};

/// How long a toggled row stays visible (struck through) before the store
/// deletion runs. Stands in for the original's removal animation.
pub const REMOVAL_GRACE: Duration = Duration::from_millis(300);

const FLASH_DURATION: Duration = Duration::from_secs(4);

/// Due-date entry format used by the add form.
pub const DUE_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Due-date display format: numeric date plus short time.
const DUE_DISPLAY_FORMAT: &str = "%m/%d/%y %H:%M";

/// Interaction mode for the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigating the list.
    Normal,
    /// The add-task modal form is open.
    AddForm,
}

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    DueDate,
}

/// State of the add-task modal form.
#[derive(Debug, Clone)]
pub struct AddFormState {
    pub title: String,
    /// Due date/time entry buffer, `YYYY-MM-DD HH:MM`.
    pub due_input: String,
    pub field: FormField,
    /// Inline notice shown when the date input does not parse.
    pub notice: Option<String>,
}

impl AddFormState {
    fn fresh() -> Self {
        Self {
            title: String::new(),
            due_input: now_input_string(),
            field: FormField::Title,
            notice: None,
        }
    }

    /// Returns the buffer the cursor is currently editing.
    pub fn active_buffer_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::DueDate => &mut self.due_input,
        }
    }
}

/// A toggled row waiting out its removal grace period.
#[derive(Debug, Clone)]
pub struct PendingRemoval {
    pub id: TaskId,
    pub deadline: Instant,
}

/// Transient notice line, used to surface storage errors without crashing.
#[derive(Debug, Clone)]
pub struct Flash {
    pub message: String,
    pub expires_at: Instant,
}

pub struct App<R: TaskRepository> {
    store: TaskStore<R>,
    subscription: StoreSubscription,
    /// Snapshot of the store contents, refreshed on change events.
    pub tasks: Vec<Task>,
    pub selected: usize,
    pub mode: Mode,
    pub form: AddFormState,
    pub pending_removals: Vec<PendingRemoval>,
    pub flash: Option<Flash>,
    pub should_quit: bool,
}

impl<R: TaskRepository> App<R> {
    pub fn new(mut store: TaskStore<R>) -> Self {
        let subscription = store.subscribe();
        let tasks = match store.tasks() {
            Ok(tasks) => tasks,
            Err(err) => {
                log::error!("event=ui_initial_load module=tui status=error error={err}");
                Vec::new()
            }
        };
        Self {
            store,
            subscription,
            tasks,
            selected: 0,
            mode: Mode::Normal,
            form: AddFormState::fresh(),
            pending_removals: Vec::new(),
            flash: None,
            should_quit: false,
        }
    }

    /// Reloads the task snapshot when the store reported changes.
    pub fn refresh_if_changed(&mut self) {
        if self.subscription.drain().is_empty() {
            return;
        }
        match self.store.tasks() {
            Ok(tasks) => {
                self.tasks = tasks;
                self.clamp_selection();
            }
            Err(err) => self.report_error(&err.to_string()),
        }
    }

    /// Runs the store toggle for every pending removal whose grace period
    /// has elapsed.
    pub fn flush_expired_removals(&mut self) {
        let now = Instant::now();
        let all: Vec<PendingRemoval> = std::mem::take(&mut self.pending_removals);
        let (expired, waiting): (Vec<_>, Vec<_>) =
            all.into_iter().partition(|pending| pending.deadline <= now);
        self.pending_removals = waiting;

        for pending in expired {
            if let Err(err) = self.store.toggle_completion(pending.id) {
                self.report_error(&err.to_string());
            }
        }
    }

    pub fn clear_expired_flash(&mut self) {
        if let Some(flash) = &self.flash {
            if flash.expires_at <= Instant::now() {
                self.flash = None;
            }
        }
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending_removals.iter().any(|pending| pending.id == id)
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.tasks.len() {
            self.selected += 1;
        }
    }

    /// Toggles the selected task's completion.
    ///
    /// Under the delete-on-complete policy the row enters the removal grace
    /// state first; the store mutation runs when the deadline expires. Under
    /// retain-completed the toggle applies immediately.
    pub fn toggle_selected(&mut self) {
        let Some(task) = self.tasks.get(self.selected) else {
            return;
        };
        let id = task.id;
        if self.is_pending(id) {
            return;
        }

        let delete_on_complete =
            self.store.config().completion_policy == CompletionPolicy::DeleteOnComplete;
        if delete_on_complete && !task.completed {
            self.pending_removals.push(PendingRemoval {
                id,
                deadline: Instant::now() + REMOVAL_GRACE,
            });
        } else if let Err(err) = self.store.toggle_completion(id) {
            self.report_error(&err.to_string());
        }
    }

    /// Deletes the selected task unconditionally.
    pub fn delete_selected(&mut self) {
        let Some(task) = self.tasks.get(self.selected) else {
            return;
        };
        let id = task.id;
        self.pending_removals.retain(|pending| pending.id != id);
        if let Err(err) = self.store.delete(id) {
            self.report_error(&err.to_string());
        }
    }

    pub fn open_add_form(&mut self) {
        self.form = AddFormState::fresh();
        self.mode = Mode::AddForm;
    }

    pub fn cancel_add_form(&mut self) {
        self.form = AddFormState::fresh();
        self.mode = Mode::Normal;
    }

    /// Saves the form: inserts the task, resets the fields, dismisses the
    /// modal. An unparsable date keeps the form open with a notice.
    pub fn submit_form(&mut self) {
        let Some(due_at) = parse_due_input(&self.form.due_input) else {
            self.form.notice = Some(format!("date must match {DUE_INPUT_FORMAT}"));
            return;
        };

        let new_task = NewTask {
            title: self.form.title.clone(),
            due_at,
        };
        match self.store.insert(&new_task) {
            Ok(_) => {
                self.form = AddFormState::fresh();
                self.mode = Mode::Normal;
            }
            Err(err) => {
                self.form.notice = Some(err.to_string());
            }
        }
    }

    fn clamp_selection(&mut self) {
        if self.tasks.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.tasks.len() {
            self.selected = self.tasks.len() - 1;
        }
    }

    fn report_error(&mut self, message: &str) {
        log::error!("event=ui_store_error module=tui status=error error={message}");
        self.flash = Some(Flash {
            message: message.to_string(),
            expires_at: Instant::now() + FLASH_DURATION,
        });
    }
}

/// Parses the form's due entry in local time. Returns epoch milliseconds.
pub fn parse_due_input(input: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), DUE_INPUT_FORMAT).ok()?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some(local.timestamp_millis())
}

/// Formats a due moment for the list row.
pub fn format_due(due_at: i64) -> String {
    match Local.timestamp_millis_opt(due_at).earliest() {
        Some(local) => local.format(DUE_DISPLAY_FORMAT).to_string(),
        None => "??/??/?? --:--".to_string(),
    }
}

/// The current local time in the form's entry format.
pub fn now_input_string() -> String {
    Local::now().format(DUE_INPUT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        parse_due_input, App, FormField, Mode, PendingRemoval, DUE_INPUT_FORMAT,
    };
    use chrono::TimeZone;
    use std::time::Instant;
    use taskdeck_core::db::open_db_in_memory;
    use taskdeck_core::{SqliteTaskRepository, TaskStore};

    fn app_over(conn: &rusqlite::Connection) -> App<SqliteTaskRepository<'_>> {
        let repo = SqliteTaskRepository::try_new(conn).unwrap();
        App::new(TaskStore::new(repo))
    }

    #[test]
    fn parse_due_input_roundtrips_through_format() {
        let millis = parse_due_input("2024-09-03 10:00").unwrap();
        let formatted = chrono::Local
            .timestamp_millis_opt(millis)
            .unwrap()
            .format(DUE_INPUT_FORMAT)
            .to_string();
        assert_eq!(formatted, "2024-09-03 10:00");
    }

    #[test]
    fn parse_due_input_rejects_garbage() {
        assert!(parse_due_input("tomorrow-ish").is_none());
        assert!(parse_due_input("2024-13-40 99:99").is_none());
    }

    #[test]
    fn submit_form_inserts_and_resets() {
        let conn = open_db_in_memory().unwrap();
        let mut app = app_over(&conn);

        app.open_add_form();
        app.form.title = "pack bags".to_string();
        app.form.due_input = "2025-01-02 08:30".to_string();
        app.submit_form();

        assert_eq!(app.mode, Mode::Normal);
        assert!(app.form.title.is_empty());
        app.refresh_if_changed();
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].title, "pack bags");
    }

    #[test]
    fn submit_form_with_bad_date_keeps_form_open() {
        let conn = open_db_in_memory().unwrap();
        let mut app = app_over(&conn);

        app.open_add_form();
        app.form.title = "broken".to_string();
        app.form.due_input = "not a date".to_string();
        app.submit_form();

        assert_eq!(app.mode, Mode::AddForm);
        assert!(app.form.notice.is_some());
        app.refresh_if_changed();
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn toggle_enters_grace_then_flush_removes() {
        let conn = open_db_in_memory().unwrap();
        let mut app = app_over(&conn);

        app.open_add_form();
        app.form.title = "done soon".to_string();
        app.submit_form();
        app.refresh_if_changed();
        assert_eq!(app.tasks.len(), 1);
        let id = app.tasks[0].id;

        app.toggle_selected();
        assert!(app.is_pending(id));
        app.refresh_if_changed();
        assert_eq!(app.tasks.len(), 1, "task visible during grace period");

        // Force the deadline into the past and flush.
        app.pending_removals = vec![PendingRemoval {
            id,
            deadline: Instant::now(),
        }];
        app.flush_expired_removals();
        app.refresh_if_changed();
        assert!(app.tasks.is_empty());
        assert!(!app.is_pending(id));
    }

    #[test]
    fn delete_selected_removes_immediately() {
        let conn = open_db_in_memory().unwrap();
        let mut app = app_over(&conn);

        app.open_add_form();
        app.form.title = "swipe away".to_string();
        app.submit_form();
        app.refresh_if_changed();

        app.delete_selected();
        app.refresh_if_changed();
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn form_field_focus_switches_active_buffer() {
        let conn = open_db_in_memory().unwrap();
        let mut app = app_over(&conn);

        app.open_add_form();
        app.form.active_buffer_mut().push('t');
        assert_eq!(app.form.title, "t");

        app.form.field = FormField::DueDate;
        app.form.active_buffer_mut().push('!');
        assert!(app.form.due_input.ends_with('!'));
    }
}
