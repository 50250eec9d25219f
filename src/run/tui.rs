use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

use crate::db::{self, Database};
use crate::models::{FilterConfig, StatusFilter, TypeFilter};
use crate::ui::app::{App, FilterPane, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

/// Launch the interactive dashboard, opening `path` or the dataset used last time.
pub(crate) fn as_tui(db: &mut Database, path: Option<PathBuf>) -> Result<()> {
    let today = Local::now().date_naive();
    let mut app = App::new(Vec::new(), FilterConfig::default_for(today));

    let path = match path {
        Some(p) => Some(p),
        None => db::load_dataset_path(&*db)?,
    };
    match path {
        Some(p) => app.open_dataset(&p, &*db, today)?,
        None => app.set_status("No dataset open. Use :open <file.json|file.csv>"),
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("tui exited with error: {e:?}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        app.refresh_view(Local::now().naive_local());
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('1') => app.screen = Screen::Dashboard,
        KeyCode::Char('2') => app.screen = Screen::Transactions,
        KeyCode::Char('3') => app.screen = Screen::Filters,
        KeyCode::Tab if app.screen == Screen::Filters => focus_pane(app, true),
        KeyCode::BackTab if app.screen == Screen::Filters => focus_pane(app, false),
        KeyCode::Tab => cycle_screen(app, true),
        KeyCode::BackTab => cycle_screen(app, false),
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') | KeyCode::Home => handle_move_top(app),
        KeyCode::Char('G') | KeyCode::End => handle_move_bottom(app),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown
            if app.screen == Screen::Transactions =>
        {
            app.set_page(app.page + 1);
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp
            if app.screen == Screen::Transactions =>
        {
            app.set_page(app.page.saturating_sub(1));
        }
        KeyCode::Char(' ') | KeyCode::Enter if app.screen == Screen::Filters => {
            toggle_focused(app, db)?;
        }
        KeyCode::Char('a') if app.screen == Screen::Filters => select_all_in_pane(app, db)?,
        KeyCode::Char('t') if app.screen == Screen::Filters => {
            app.filters.tx_type = next_of(TypeFilter::all(), app.filters.tx_type);
            app.set_status(format!("Type: {}", app.filters.tx_type));
            app.filters_changed(&*db)?;
        }
        KeyCode::Char('s') if app.screen == Screen::Filters => {
            app.filters.status = next_of(StatusFilter::all(), app.filters.status);
            app.set_status(format!("Status: {}", app.filters.status));
            app.filters_changed(&*db)?;
        }
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
    Ok(())
}

fn cycle_screen(app: &mut App, forward: bool) {
    let screens = Screen::all();
    let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
    let next = if forward {
        (idx + 1) % screens.len()
    } else if idx == 0 {
        screens.len() - 1
    } else {
        idx - 1
    };
    app.screen = screens[next];
}

/// The option after `current`, wrapping around.
fn next_of<T: Copy + PartialEq>(options: &[T], current: T) -> T {
    let idx = options.iter().position(|o| *o == current).unwrap_or(0);
    options.get((idx + 1) % options.len().max(1)).copied().unwrap_or(current)
}

fn focus_pane(app: &mut App, forward: bool) {
    app.filter_pane = if forward {
        app.filter_pane.next()
    } else {
        app.filter_pane.prev()
    };
    app.pane_index = 0;
    app.pane_scroll = 0;
}

fn handle_move_down(app: &mut App) {
    match app.screen {
        Screen::Transactions => {
            let rows = app.filtered_len().saturating_sub((app.page - 1) * app.per_page);
            let on_page = rows.min(app.per_page);
            if app.row_index + 1 < on_page {
                app.row_index += 1;
            }
        }
        Screen::Filters => {
            let len = app.pane_values(app.filter_pane).len();
            let page = app.visible_rows.saturating_sub(4).max(1);
            scroll_down(&mut app.pane_index, &mut app.pane_scroll, len, page);
        }
        Screen::Dashboard => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Transactions => app.row_index = app.row_index.saturating_sub(1),
        Screen::Filters => scroll_up(&mut app.pane_index, &mut app.pane_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_move_top(app: &mut App) {
    match app.screen {
        Screen::Transactions => app.set_page(1),
        Screen::Filters => scroll_to_top(&mut app.pane_index, &mut app.pane_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_move_bottom(app: &mut App) {
    match app.screen {
        Screen::Transactions => app.set_page(app.total_pages()),
        Screen::Filters => {
            let len = app.pane_values(app.filter_pane).len();
            let page = app.visible_rows.saturating_sub(4).max(1);
            scroll_to_bottom(&mut app.pane_index, &mut app.pane_scroll, len, page);
        }
        Screen::Dashboard => {}
    }
}

fn toggle_focused(app: &mut App, db: &mut Database) -> Result<()> {
    let pane = app.filter_pane;
    let values = app.pane_values(pane);
    let Some(value) = values.get(app.pane_index) else {
        return Ok(());
    };
    app.toggle_in_pane(pane, value);
    let len = app.pane_values(pane).len();
    if app.pane_index >= len {
        app.pane_index = len.saturating_sub(1);
    }
    app.filters_changed(&*db)
}

fn select_all_in_pane(app: &mut App, db: &mut Database) -> Result<()> {
    let input = match app.filter_pane {
        FilterPane::Accounts => "all-accounts",
        FilterPane::Industries => "all-industries",
        FilterPane::States => {
            app.filters.states.clear();
            app.set_status("Any state");
            return app.filters_changed(&*db);
        }
    };
    commands::handle_command(input, app, db)
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            if let Err(e) = commands::handle_command(&input, app, db) {
                tracing::warn!(command = %input, "command failed: {e:#}");
                app.set_status(format!("Error: {e}"));
            }
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}
