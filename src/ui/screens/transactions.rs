use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_date, format_signed_amount, page_slice, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let rows_all = app.view().map(|v| v.transactions.as_slice()).unwrap_or(&[]);
    let title = format!(
        " Transactions ({}) page {}/{} ",
        rows_all.len(),
        app.page,
        app.total_pages()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(false))
        .title(Span::styled(title, theme::title_style()));

    if rows_all.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No transactions match the current filters",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Widen them with :reset or :range all, or open a dataset with :open",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Date", "Description", "Account", "Industry", "State", "Status", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = page_slice(rows_all, app.page, app.per_page)
        .iter()
        .enumerate()
        .map(|(i, txn)| {
            let amount_style = if txn.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            let status_style = if txn.is_pending() {
                theme::pending_style()
            } else {
                Style::default()
            };

            let style = if i == app.row_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(format_date(&txn.date)),
                Cell::from(truncate(&txn.description, 40)),
                Cell::from(truncate(&txn.account, 18)),
                Cell::from(truncate(&txn.industry, 18)),
                Cell::from(txn.state_label().to_string()),
                Cell::from(Span::styled(txn.status.as_str(), status_style)),
                Cell::from(Span::styled(
                    format_signed_amount(txn),
                    amount_style,
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
