use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::aggregate::{BalancePoint, DashboardView, FlowBucket, Series};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_date, format_percent, format_signed_amount, truncate};

const BAR_WIDTH: u16 = 3;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Min(10),   // Charts
            Constraint::Length(8), // Recent activity
        ])
        .split(area);

    let Some(view) = app.view() else {
        render_placeholder(f, area, "Dashboard", "Loading…");
        return;
    };

    render_summary_cards(f, chunks[0], view);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    render_flow_chart(f, charts[0], &view.flow);
    render_balance_chart(f, charts[1], &view.balance);

    render_recent_activity(f, chunks[2], view);
}

fn titled_block<'a>(title: &str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(false))
        .title(Span::styled(format!(" {title} "), theme::title_style()))
}

fn render_placeholder(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, theme::dim_style())),
    ])
    .centered()
    .block(titled_block(title));
    f.render_widget(msg, area);
}

fn render_summary_cards(f: &mut Frame, area: Rect, view: &DashboardView) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let s = &view.summary;
    render_card(
        f,
        cards[0],
        "Income",
        s.total_income,
        theme::GREEN,
        format!("{} txns", s.income_count),
    );
    render_card(
        f,
        cards[1],
        "Expenses",
        s.total_expense,
        theme::RED,
        format!("{} txns", s.expense_count),
    );
    render_card(
        f,
        cards[2],
        "Balance",
        s.balance,
        theme::balance_color(s.balance),
        format!("{} net", format_percent(s.net_pct)),
    );
    render_card(
        f,
        cards[3],
        "Pending",
        s.pending_total,
        theme::YELLOW,
        format!("{} txns", s.pending_count),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, amount: Decimal, color: Color, subtitle: String) {
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(titled_block(title));

    f.render_widget(text, area);
}

fn to_bar_value(val: Decimal) -> u64 {
    val.round().to_u64().unwrap_or(0)
}

fn render_flow_chart(f: &mut Frame, area: Rect, flow: &Series<FlowBucket>) {
    let title = format!("Cash Flow ({})", flow.granularity);
    if flow.is_empty() {
        render_placeholder(f, area, &title, "No completed transactions in this period");
        return;
    }

    // Two bars plus the group gap per bucket; keep the most recent buckets that fit
    let group_width = BAR_WIDTH * 2 + 2;
    let fits = (area.width.saturating_sub(2) / group_width).max(1) as usize;
    let skip = flow.len().saturating_sub(fits);

    let mut chart = BarChart::default()
        .block(titled_block(&title))
        .bar_width(BAR_WIDTH)
        .bar_gap(0)
        .group_gap(2)
        .value_style(Style::default().fg(theme::HEADER_BG));

    for bucket in flow.buckets.iter().skip(skip) {
        let bars = [
            Bar::default()
                .value(to_bar_value(bucket.income))
                .text_value(String::new())
                .style(theme::income_style()),
            Bar::default()
                .value(to_bar_value(bucket.expense))
                .text_value(String::new())
                .style(theme::expense_style()),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(truncate(&bucket.label, group_width as usize)))
                .bars(&bars),
        );
    }

    f.render_widget(chart, area);
}

/// Y-axis bounds covering every value and zero, padded so the line never
/// sits on the border.
fn balance_bounds(points: &[BalancePoint]) -> [f64; 2] {
    let values = points.iter().filter_map(|p| p.balance.to_f64());
    let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = ((max - min) * 0.05).max(1.0);
    [min - pad, max + pad]
}

fn render_balance_chart(f: &mut Frame, area: Rect, balance: &Series<BalancePoint>) {
    if balance.is_empty() {
        render_placeholder(f, area, "Cumulative Balance", "No completed transactions in this period");
        return;
    }

    let points: Vec<(f64, f64)> = balance
        .buckets
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.balance.to_f64().unwrap_or(0.0)))
        .collect();
    let [y_min, y_max] = balance_bounds(&balance.buckets);
    let x_max = (points.len().saturating_sub(1) as f64).max(1.0);

    let first = balance.buckets.first().map(|p| p.label.clone()).unwrap_or_default();
    let last = balance.buckets.last().map(|p| p.label.clone()).unwrap_or_default();
    let final_balance = balance.buckets.last().map_or(Decimal::ZERO, |p| p.balance);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme::TEAL))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(titled_block(&format!("Cumulative Balance {}", format_amount(final_balance))))
        .x_axis(
            Axis::default()
                .style(theme::dim_style())
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(
            Axis::default()
                .style(theme::dim_style())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format_axis(y_min)),
                    Span::raw(format_axis(y_max)),
                ]),
        );

    f.render_widget(chart, area);
}

fn format_axis(val: f64) -> String {
    format_amount(Decimal::from_f64_retain(val.round()).unwrap_or_default())
}

fn render_recent_activity(f: &mut Frame, area: Rect, view: &DashboardView) {
    let recent = view.recent();
    if recent.is_empty() {
        render_placeholder(f, area, "Recent Activity", "No transactions match the current filters");
        return;
    }

    let rows: Vec<Row> = recent
        .iter()
        .map(|txn| {
            let style = if txn.is_expense() {
                theme::expense_style()
            } else {
                theme::income_style()
            };
            let status_style = if txn.is_pending() {
                theme::pending_style()
            } else {
                theme::dim_style()
            };
            Row::new(vec![
                Cell::from(format_date(&txn.date)),
                Cell::from(truncate(&txn.description, 40)),
                Cell::from(truncate(&txn.account, 16)),
                Cell::from(Span::styled(txn.status.as_str(), status_style)),
                Cell::from(Span::styled(format_signed_amount(txn), style)),
            ])
            .style(theme::normal_style())
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Length(16),
    ];
    let table = Table::new(rows, widths).block(titled_block("Recent Activity"));
    f.render_widget(table, area);
}
