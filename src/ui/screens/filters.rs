use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::app::{App, FilterPane};
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);

    render_scalar_filters(f, chunks[0], app);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);

    for (pane, rect) in FilterPane::all().iter().zip(panes.iter()) {
        render_pane(f, *rect, app, *pane);
    }
}

fn render_scalar_filters(f: &mut Frame, area: Rect, app: &App) {
    let date = |d: Option<chrono::NaiveDate>| d.map_or("open".to_string(), |d| d.format("%d/%m/%Y").to_string());
    let lines = vec![
        Line::from(vec![
            Span::styled("  From ", theme::dim_style()),
            Span::styled(date(app.filters.start_date), theme::normal_style()),
            Span::styled("   To ", theme::dim_style()),
            Span::styled(date(app.filters.end_date), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled("  Type ", theme::dim_style()),
            Span::styled(app.filters.tx_type.as_str(), theme::normal_style()),
            Span::styled("   Status ", theme::dim_style()),
            Span::styled(app.filters.status.as_str(), theme::normal_style()),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(false))
        .title(Span::styled(" Range & Type (:from :to :type :status) ", theme::title_style()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_pane(f: &mut Frame, area: Rect, app: &App, pane: FilterPane) {
    let focused = app.filter_pane == pane;
    let values = app.pane_values(pane);
    let selected = values.iter().filter(|v| app.pane_selected(pane, v)).count();
    let summary = match pane {
        FilterPane::States if app.filters.states.is_empty() => "any".to_string(),
        _ => format!("{selected}/{}", values.len()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(focused))
        .title(Span::styled(format!(" {pane} ({summary}) "), theme::title_style()));

    if values.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled("Nothing to filter", theme::dim_style())))
            .centered()
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let height = area.height.saturating_sub(2) as usize;
    let scroll = if focused { app.pane_scroll } else { 0 };
    let width = area.width.saturating_sub(8) as usize;

    let items: Vec<ListItem> = values
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(i, value)| {
            let mark = if app.pane_selected(pane, value) { "[x]" } else { "[ ]" };
            let label = if value.is_empty() { "(none)" } else { value.as_str() };
            let style = if focused && i == app.pane_index {
                theme::selected_style()
            } else if app.pane_selected(pane, value) {
                theme::normal_style().add_modifier(Modifier::BOLD)
            } else {
                theme::dim_style()
            };
            ListItem::new(Line::from(Span::styled(
                format!(" {mark} {}", truncate(label, width)),
                style,
            )))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
