//! Keyboard handling.
//!
//! Translates key presses into store mutations and form edits, one discrete
//! user action per event.

use crate::app::{App, FormField, Mode};
use crossterm::event::{KeyCode, KeyEvent};
use taskdeck_core::TaskRepository;

pub fn handle_key<R: TaskRepository>(app: &mut App<R>, key: KeyEvent) {
    match app.mode {
        Mode::Normal => handle_normal_key(app, key),
        Mode::AddForm => handle_form_key(app, key),
    }
}

fn handle_normal_key<R: TaskRepository>(app: &mut App<R>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('a') => app.open_add_form(),
        _ => {}
    }
}

fn handle_form_key<R: TaskRepository>(app: &mut App<R>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_add_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::BackTab => {
            app.form.field = match app.form.field {
                FormField::Title => FormField::DueDate,
                FormField::DueDate => FormField::Title,
            };
        }
        KeyCode::Backspace => {
            app.form.active_buffer_mut().pop();
            app.form.notice = None;
        }
        KeyCode::Char(c) => {
            app.form.active_buffer_mut().push(c);
            app.form.notice = None;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::handle_key;
    use crate::app::{App, Mode};
    use crossterm::event::{KeyCode, KeyEvent};
    use taskdeck_core::db::open_db_in_memory;
    use taskdeck_core::{SqliteTaskRepository, TaskStore};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn typing_into_form_builds_title() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteTaskRepository::try_new(&conn).unwrap();
        let mut app = App::new(TaskStore::new(repo));

        handle_key(&mut app, press(KeyCode::Char('a')));
        assert_eq!(app.mode, Mode::AddForm);

        for c in "milk".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        assert_eq!(app.form.title, "milk");

        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.form.title, "mil");
    }

    #[test]
    fn escape_cancels_form_without_insert() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteTaskRepository::try_new(&conn).unwrap();
        let mut app = App::new(TaskStore::new(repo));

        handle_key(&mut app, press(KeyCode::Char('a')));
        handle_key(&mut app, press(KeyCode::Char('x')));
        handle_key(&mut app, press(KeyCode::Esc));

        assert_eq!(app.mode, Mode::Normal);
        app.refresh_if_changed();
        assert!(app.tasks.is_empty());
        assert!(!app.should_quit);
    }

    #[test]
    fn q_quits_from_normal_mode() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteTaskRepository::try_new(&conn).unwrap();
        let mut app = App::new(TaskStore::new(repo));

        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
