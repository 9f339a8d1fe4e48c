//! taskdeck: a persisted, single-screen to-do list for the terminal.
//!
//! Wires the core store to the list view: opens (and migrates) the local
//! database, loads store configuration, then runs the event loop. All store
//! mutations happen synchronously on this thread in response to key presses.

mod app;
mod input;
mod render;

use app::App;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use taskdeck_core::db::open_db;
use taskdeck_core::{
    default_log_level, init_logging, SqliteTaskRepository, StoreConfig, TaskStore,
};

const DB_FILE: &str = "taskdeck.db3";
const CONFIG_FILE: &str = "taskdeck.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TASKDECK_DB").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DB_FILE));

    let log_dir = std::env::current_dir()?.join("logs");
    if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        // The app is still usable without file logging.
        eprintln!("warning: logging disabled: {err}");
    }

    let config_path = std::env::var("TASKDECK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));
    let config = StoreConfig::load(&config_path)?;

    let conn = open_db(&db_path)?;
    let repo = SqliteTaskRepository::try_new(&conn)?;
    let store = TaskStore::with_config(repo, config);
    let mut app = App::new(store);

    // Terminal setup, mirrored by the teardown below and the panic hook.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<SqliteTaskRepository<'_>>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.clear_expired_flash();
        app.flush_expired_removals();
        app.refresh_if_changed();

        terminal.draw(|frame| render::render(frame, app))?;

        // Short poll keeps removal grace periods responsive.
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    input::handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
