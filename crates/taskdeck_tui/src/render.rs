//! Screen rendering.
//!
//! One screen: the task list, a key-hint footer, and the add-task modal
//! drawn over the list when open.

use crate::app::{format_due, App, FormField, Mode};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use taskdeck_core::{Task, TaskRepository};

pub fn render<R: TaskRepository>(frame: &mut Frame<'_>, app: &App<R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_list(frame, app, chunks[0]);
    render_footer(frame, app, chunks[1]);

    if app.mode == Mode::AddForm {
        render_add_form(frame, app);
    }
}

fn render_list<R: TaskRepository>(frame: &mut Frame<'_>, app: &App<R>, area: Rect) {
    let items: Vec<ListItem> = app
        .tasks
        .iter()
        .map(|task| task_row(task, app.is_pending(task.id)))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" taskdeck "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if !app.tasks.is_empty() {
        state.select(Some(app.selected.min(app.tasks.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// One task row: completion indicator, title, due date.
///
/// A row counts as visually completed while it waits out the removal grace
/// period, so the strikethrough shows before the record disappears.
fn task_row(task: &Task, pending_removal: bool) -> ListItem<'static> {
    let completed = task.completed || pending_removal;

    let indicator = if completed {
        Span::styled("● ", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ ", Style::default().fg(Color::DarkGray))
    };

    let title_style = if completed {
        Style::default().add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    let line = Line::from(vec![
        indicator,
        Span::styled(task.title.clone(), title_style),
        Span::raw("  "),
        Span::styled(format_due(task.due_at), Style::default().fg(Color::DarkGray)),
    ]);
    ListItem::new(line)
}

fn render_footer<R: TaskRepository>(frame: &mut Frame<'_>, app: &App<R>, area: Rect) {
    let text = match &app.flash {
        Some(flash) => Line::from(Span::styled(
            flash.message.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            " a add  space toggle  d delete  j/k move  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(text), area);
}

fn render_add_form<R: TaskRepository>(frame: &mut Frame<'_>, app: &App<R>) {
    let area = centered_rect(50, 8, frame.area());
    frame.render_widget(Clear, area);

    let focus_marker = |field: FormField| {
        if app.form.field == field {
            "> "
        } else {
            "  "
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::raw(focus_marker(FormField::Title)),
            Span::styled("Title: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(app.form.title.clone()),
        ]),
        Line::from(vec![
            Span::raw(focus_marker(FormField::DueDate)),
            Span::styled("Due:   ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(app.form.due_input.clone()),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "enter save  tab switch field  esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(notice) = &app.form.notice {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" New Task "));
    frame.render_widget(form, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
