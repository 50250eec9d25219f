use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use super::app::{App, FilterPane, Screen};
use crate::aggregate::days_before;
use crate::db::{self, Database};
use crate::models::{StatusFilter, TypeFilter};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit flowdash", cmd_quit, r);
    register_command!("quit", "Quit flowdash", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("f", "Go to Filters", cmd_filters, r);
    register_command!("filters", "Go to Filters", cmd_filters, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("from", "Set start date (e.g. :from 2024-01-01, :from clear)", cmd_from, r);
    register_command!("to", "Set end date (e.g. :to 2024-01-31, :to clear)", cmd_to, r);
    register_command!(
        "range",
        "Set date range (e.g. :range 2024-01-01 2024-03-31, :range 90d, :range all)",
        cmd_range,
        r
    );
    register_command!("type", "Filter by type (all, income, expense)", cmd_type, r);
    register_command!("status", "Filter by status (all, completed, pending)", cmd_status, r);
    register_command!("account", "Toggle an account (e.g. :account Checking)", cmd_account, r);
    register_command!("industry", "Toggle an industry (e.g. :industry Retail)", cmd_industry, r);
    register_command!("state", "Toggle a state (e.g. :state SP)", cmd_state, r);
    register_command!("all-accounts", "Select every available account", cmd_all_accounts, r);
    register_command!("all-industries", "Select every industry", cmd_all_industries, r);
    register_command!("reset", "Reset filters to cover the whole dataset", cmd_reset, r);
    register_command!("logout", "Forget saved filters and reset", cmd_logout, r);
    register_command!("reload", "Reload the dataset file", cmd_reload, r);
    register_command!("o", "Open a dataset (e.g. :o ~/data.json)", cmd_open, r);
    register_command!("open", "Open a dataset (e.g. :open ~/data.json)", cmd_open, r);
    register_command!("page", "Go to page (e.g. :page 3)", cmd_page, r);
    register_command!("next-page", "Go to next page", cmd_next_page, r);
    register_command!("prev-page", "Go to previous page", cmd_prev_page, r);
    register_command!("per-page", "Rows per page (e.g. :per-page 25)", cmd_per_page, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `YYYY-MM-DD` or `dd/mm/yyyy`.
pub(crate) fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ── Navigation ───────────────────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    Ok(())
}

fn cmd_filters(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Filters;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

// ── Date range ───────────────────────────────────────────────

fn cmd_from(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    set_bound(args, app, db, true)
}

fn cmd_to(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    set_bound(args, app, db, false)
}

fn set_bound(args: &str, app: &mut App, db: &mut Database, start: bool) -> anyhow::Result<()> {
    let value = if args.is_empty() || args.eq_ignore_ascii_case("clear") {
        None
    } else if let Some(date) = parse_day(args) {
        Some(date)
    } else {
        app.set_status(format!("Invalid date '{args}'. Use YYYY-MM-DD"));
        return Ok(());
    };

    if start {
        app.filters.start_date = value;
    } else {
        app.filters.end_date = value;
    }
    app.filters_changed(&*db)?;
    app.set_status(app.filters.describe());
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        ["all"] => {
            app.filters.start_date = None;
            app.filters.end_date = None;
        }
        [days] if days.ends_with('d') => {
            let Ok(n) = days.trim_end_matches('d').parse::<i64>() else {
                app.set_status(format!("Invalid range '{days}'"));
                return Ok(());
            };
            if n < 1 {
                app.set_status("Range must cover at least 1 day");
                return Ok(());
            }
            let end = today();
            app.filters.start_date = Some(days_before(end, n - 1));
            app.filters.end_date = Some(end);
        }
        [from, to] => match (parse_day(from), parse_day(to)) {
            (Some(start), Some(end)) => {
                app.filters.start_date = Some(start);
                app.filters.end_date = Some(end);
            }
            _ => {
                app.set_status("Invalid dates. Use YYYY-MM-DD");
                return Ok(());
            }
        },
        _ => {
            app.set_status("Usage: :range <from> <to> | :range <N>d | :range all");
            return Ok(());
        }
    }
    app.filters_changed(&*db)?;
    app.set_status(app.filters.describe());
    Ok(())
}

// ── Type / status ────────────────────────────────────────────

fn cmd_type(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(tx_type) = TypeFilter::parse(args) else {
        app.set_status(format!("Unknown type '{args}'. Use all, income or expense"));
        return Ok(());
    };
    app.filters.tx_type = tx_type;
    app.filters_changed(&*db)?;
    app.set_status(format!("Type: {tx_type}"));
    Ok(())
}

fn cmd_status(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(status) = StatusFilter::parse(args) else {
        app.set_status(format!("Unknown status '{args}'. Use all, completed or pending"));
        return Ok(());
    };
    app.filters.status = status;
    app.filters_changed(&*db)?;
    app.set_status(format!("Status: {status}"));
    Ok(())
}

// ── Categorical ──────────────────────────────────────────────

/// Case-insensitive lookup of `name` among `values`.
fn find_value<'a>(values: impl IntoIterator<Item = &'a String>, name: &str) -> Option<String> {
    values
        .into_iter()
        .find(|v| v.eq_ignore_ascii_case(name))
        .cloned()
}

fn cmd_account(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let available = app.available_accounts();
    let Some(account) = find_value(&available, args) else {
        let names: Vec<&str> = available.iter().map(String::as_str).collect();
        app.set_status(format!("Account not found. Available: {}", names.join(", ")));
        return Ok(());
    };
    app.toggle_in_pane(FilterPane::Accounts, &account);
    app.filters_changed(&*db)?;
    let state = if app.pane_selected(FilterPane::Accounts, &account) {
        "selected"
    } else {
        "deselected"
    };
    app.set_status(format!("Account {account} {state}"));
    Ok(())
}

fn cmd_industry(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(industry) = find_value(&app.facets.industries, args) else {
        let names: Vec<&str> = app.facets.industries.iter().map(String::as_str).collect();
        let msg = format!("Industry not found. Available: {}", names.join(", "));
        app.set_status(msg);
        return Ok(());
    };
    app.toggle_in_pane(FilterPane::Industries, &industry);
    app.filters_changed(&*db)?;
    app.set_status(format!("Industries: {}", describe_count(&app.filters.industries)));
    Ok(())
}

fn cmd_state(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(state) = find_value(&app.facets.states, args) else {
        let names: Vec<&str> = app.facets.states.iter().map(String::as_str).collect();
        let msg = format!("State not found. Available: {}", names.join(", "));
        app.set_status(msg);
        return Ok(());
    };
    app.toggle_state(&state);
    app.filters_changed(&*db)?;
    app.set_status(if app.filters.states.is_empty() {
        "States: any".to_string()
    } else {
        let names: Vec<&str> = app.filters.states.iter().map(String::as_str).collect();
        format!("States: {}", names.join(", "))
    });
    Ok(())
}

fn describe_count(selection: &Option<std::collections::BTreeSet<String>>) -> String {
    match selection {
        None => "all".to_string(),
        Some(set) => set.len().to_string(),
    }
}

fn cmd_all_accounts(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.filters.accounts = Some(app.available_accounts());
    app.filters_changed(&*db)?;
    app.set_status("All accounts selected");
    Ok(())
}

fn cmd_all_industries(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.filters.industries = Some(app.facets.industries.clone());
    app.filters_changed(&*db)?;
    app.set_status("All industries selected");
    Ok(())
}

// ── Session ──────────────────────────────────────────────────

fn cmd_reset(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.reset_filters(today());
    app.filters_changed(&*db)?;
    app.set_status("Filters reset");
    Ok(())
}

fn cmd_logout(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    db::clear_filters(&*db)?;
    app.reset_filters(today());
    app.set_page(1);
    tracing::info!("saved filters cleared");
    app.set_status("Saved filters cleared");
    Ok(())
}

fn cmd_reload(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.reload(&*db, today())
}

fn cmd_open(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :open <file.json|file.csv>");
        return Ok(());
    }
    let path = PathBuf::from(shellexpand(args));
    if !path.exists() {
        app.set_status(format!("File not found: {}", path.display()));
        return Ok(());
    }
    app.open_dataset(&path, &*db, today())?;
    app.screen = Screen::Dashboard;
    Ok(())
}

// ── Pagination ───────────────────────────────────────────────

fn cmd_page(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    match args.parse::<usize>() {
        Ok(page) if page >= 1 => {
            app.set_page(page);
            app.screen = Screen::Transactions;
            app.set_status(format!("Page {} of {}", app.page, app.total_pages()));
        }
        _ => app.set_status("Usage: :page <number>"),
    }
    Ok(())
}

fn cmd_next_page(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.set_page(app.page + 1);
    Ok(())
}

fn cmd_prev_page(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.set_page(app.page.saturating_sub(1));
    Ok(())
}

fn cmd_per_page(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    match args.parse::<usize>() {
        Ok(n) if (1..=500).contains(&n) => {
            app.per_page = n;
            app.set_page(1);
            app.set_status(format!("{n} rows per page"));
        }
        _ => app.set_status("Usage: :per-page <1-500>"),
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
