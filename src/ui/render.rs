use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands::COMMANDS;
use super::theme;

/// Commands listed in the help overlay, grouped by what they act on.
const HELP_GROUPS: &[(&str, &[&str])] = &[
    ("Dates", &["from", "to", "range"]),
    ("Type & status", &["type", "status"]),
    ("Accounts, industries, states", &["account", "all-accounts", "industry", "all-industries", "state"]),
    ("Pages", &["page", "next-page", "prev-page", "per-page"]),
    ("Session", &["open", "reload", "reset", "logout", "quit"]),
];

pub(crate) fn render(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, rows[0], app);
    match app.screen {
        Screen::Dashboard => super::screens::dashboard::render(f, rows[1], app),
        Screen::Transactions => super::screens::transactions::render(f, rows[1], app),
        Screen::Filters => super::screens::filters::render(f, rows[1], app),
    }
    render_filter_bar(f, rows[2], app);
    render_prompt(f, rows[3], app);

    if app.show_help {
        render_help(f, f.area());
    }
}

/// Screen tabs on the left, the open dataset on the right.
fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let dataset = match &app.dataset_path {
        Some(path) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            format!(" {name} ({} rows) ", app.transactions.len())
        }
        None => " no dataset ".to_string(),
    };
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(dataset.chars().count() as u16)])
        .split(area);

    let selected = Screen::all().iter().position(|s| *s == app.screen);
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!("{}:{s}", i + 1)))
        .collect();
    let tabs = Tabs::new(titles)
        .select(selected.unwrap_or(0))
        .style(Style::default().fg(theme::TEXT_DIM).bg(theme::HEADER_BG))
        .highlight_style(Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD))
        .divider(Span::styled("|", Style::default().fg(theme::OVERLAY)));
    f.render_widget(tabs, cols[0]);

    let label = Paragraph::new(Span::styled(dataset, Style::default().fg(theme::TEAL)))
        .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(label, cols[1]);
}

fn chip<'a>(name: &'a str, value: String) -> [Span<'a>; 2] {
    [
        Span::styled(format!(" {name} "), theme::dim_style().bg(theme::SURFACE)),
        Span::styled(format!("{value} "), theme::normal_style().bg(theme::SURFACE)),
    ]
}

/// Input mode badge followed by the active filters and row counts.
fn render_filter_bar(f: &mut Frame, area: Rect, app: &App) {
    let badge_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command => theme::GREEN,
    };
    let mut spans = vec![Span::styled(
        format!(" {} ", app.input_mode),
        Style::default()
            .fg(theme::HEADER_BG)
            .bg(badge_bg)
            .add_modifier(Modifier::BOLD),
    )];

    let day = |d: Option<chrono::NaiveDate>| d.map_or("..".to_string(), |d| d.format("%d/%m/%Y").to_string());
    let filters = &app.filters;
    spans.extend(chip("range", format!("{} - {}", day(filters.start_date), day(filters.end_date))));
    spans.extend(chip("type", filters.tx_type.to_string()));
    spans.extend(chip("status", filters.status.to_string()));
    if !filters.states.is_empty() {
        let states: Vec<&str> = filters.states.iter().map(String::as_str).collect();
        spans.extend(chip("states", states.join(",")));
    }
    if let Some(view) = app.view() {
        spans.extend(chip("buckets", view.flow.granularity.to_string()));
    }
    spans.extend(chip(
        "rows",
        format!("{}/{}", app.filtered_len(), app.transactions.len()),
    ));

    let bar = Paragraph::new(Line::from(spans)).style(theme::status_bar_style());
    f.render_widget(bar, area);
}

/// Command input while typing, otherwise the last status message or a hint.
fn render_prompt(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.input_mode {
        InputMode::Command => {
            let typed = app.command_input.chars().count() as u16;
            f.set_cursor_position((area.x + 1 + typed, area.y));
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(app.command_input.as_str(), theme::command_bar_style()),
            ])
        }
        InputMode::Normal if !app.status_message.is_empty() => Line::from(Span::styled(
            app.status_message.as_str(),
            theme::command_bar_style(),
        )),
        InputMode::Normal => {
            let keys = match app.screen {
                Screen::Dashboard => " : command  ? help  Tab next screen",
                Screen::Transactions => " : command  ? help  j/k row  h/l page",
                Screen::Filters => " : command  ? help  Tab pane  Space toggle  a all  t/s cycle",
            };
            Line::from(Span::styled(keys, theme::dim_style()))
        }
    };
    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme::COMMAND_BG)),
        area,
    );
}

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default().fg(theme::YELLOW).add_modifier(Modifier::BOLD),
    ))
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        heading(" Keys"),
        Line::from("  1-3 / Tab   switch screen      Ctrl-q     quit"),
        Line::from("  j/k g/G     move, top, bottom  h/l        page (Transactions)"),
        Line::from("  Space / a   toggle / select all in the focused pane (Filters)"),
        Line::from("  t / s       cycle type / status (Filters)"),
    ];
    for (title, names) in HELP_GROUPS {
        lines.push(Line::from(""));
        lines.push(heading(title));
        for name in *names {
            if let Some(cmd) = COMMANDS.get(name) {
                lines.push(Line::from(format!("  :{name:<15} {}", cmd.description)));
            }
        }
    }
    lines
}

fn render_help(f: &mut Frame, area: Rect) {
    let lines = help_lines();
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let width = 88.min(area.width.saturating_sub(4));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(Span::styled(" flowdash help, any key closes ", theme::title_style()))
        .style(Style::default().fg(theme::TEXT).bg(theme::HEADER_BG));
    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_help_groups_name_registered_commands() {
        for (_, names) in HELP_GROUPS {
            for name in *names {
                assert!(COMMANDS.contains_key(name), "missing command :{name}");
            }
        }
    }

    #[test]
    fn test_help_lists_every_group() {
        let text: Vec<String> = help_lines().iter().map(|l| l.to_string()).collect();
        for (title, _) in HELP_GROUPS {
            assert!(text.iter().any(|l| l.contains(title)));
        }
        assert!(text.iter().any(|l| l.contains(":range")));
    }
}
