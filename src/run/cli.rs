use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

use crate::aggregate::{accounts_for_states, reconcile_accounts, DashboardView, DatasetFacets};
use crate::db::{self, Database};
use crate::import::{FileSource, TransactionSource};
use crate::models::{FilterConfig, StatusFilter, Transaction, TypeFilter};
use crate::ui::commands::{parse_day, shellexpand};
use crate::ui::util::{format_amount, format_date, format_percent, format_signed_amount, page_slice, total_pages, truncate, DEFAULT_PER_PAGE};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "open" | "o" => cli_open(&args[2..], db),
        "summary" | "s" => cli_summary(&args[2..]),
        "list" | "ls" => cli_list(&args[2..]),
        "series" => cli_series(&args[2..]),
        "filters" => cli_filters(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("flowdash {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("flowdash - local cash flow dashboard");
    println!();
    println!("Usage: flowdash [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch the TUI with the last dataset");
    println!("  open <file>                   Launch the TUI on a JSON or CSV dataset");
    println!("  summary <file> [filters]      Print income, expense and balance totals");
    println!("  list <file> [filters]         Print matching transactions, newest first");
    println!("    --page <N>                  Page to print (default: 1)");
    println!("    --per-page <N>              Rows per page (default: {DEFAULT_PER_PAGE})");
    println!("  series <file> [flow|balance]  Print the bucketed cash flow or running balance");
    println!("  filters [show|clear]          Show or forget the saved TUI filters");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Filters (default: the whole dataset):");
    println!("  --from <YYYY-MM-DD>           First day, inclusive");
    println!("  --to <YYYY-MM-DD>             Last day, inclusive");
    println!("  --type <all|income|expense>");
    println!("  --status <all|completed|pending>");
    println!("  --account <name>              Repeatable");
    println!("  --industry <name>             Repeatable");
    println!("  --state <code>                Repeatable");
    println!("  --json                        Print JSON instead of text");
}

/// Parsed command-line arguments shared by the reporting commands.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    positional: Vec<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    tx_type: Option<TypeFilter>,
    status: Option<StatusFilter>,
    accounts: Vec<String>,
    industries: Vec<String>,
    states: Vec<String>,
    page: Option<usize>,
    per_page: Option<usize>,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--json" {
            parsed.json = true;
            continue;
        }
        if !arg.starts_with("--") {
            parsed.positional.push(arg.clone());
            continue;
        }
        let value = iter
            .next()
            .with_context(|| format!("Missing value for {arg}"))?;
        match arg.as_str() {
            "--from" => parsed.from = Some(parse_date_flag(arg, value)?),
            "--to" => parsed.to = Some(parse_date_flag(arg, value)?),
            "--type" => {
                parsed.tx_type = Some(
                    TypeFilter::parse(value)
                        .with_context(|| format!("Invalid --type '{value}' (all, income, expense)"))?,
                )
            }
            "--status" => {
                parsed.status = Some(StatusFilter::parse(value).with_context(|| {
                    format!("Invalid --status '{value}' (all, completed, pending)")
                })?)
            }
            "--account" => parsed.accounts.push(value.clone()),
            "--industry" => parsed.industries.push(value.clone()),
            "--state" => parsed.states.push(value.clone()),
            "--page" => parsed.page = Some(parse_count_flag(arg, value)?),
            "--per-page" => parsed.per_page = Some(parse_count_flag(arg, value)?),
            other => anyhow::bail!("Unknown flag: {other}"),
        }
    }
    Ok(parsed)
}

fn parse_date_flag(flag: &str, value: &str) -> Result<NaiveDate> {
    parse_day(value).with_context(|| format!("Invalid date for {flag}: '{value}' (use YYYY-MM-DD)"))
}

fn parse_count_flag(flag: &str, value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => anyhow::bail!("{flag} expects a positive number, got '{value}'"),
    }
}

impl CliArgs {
    /// The dataset file named by the first positional argument.
    fn dataset(&self, usage: &str) -> Result<PathBuf> {
        let Some(raw) = self.positional.first() else {
            anyhow::bail!("Usage: {usage}");
        };
        let path = PathBuf::from(shellexpand(raw));
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        Ok(path)
    }

    /// Filters covering the whole dataset, narrowed by the flags given.
    fn filters(&self, txs: &[Transaction], today: NaiveDate) -> FilterConfig {
        let facets = DatasetFacets::collect(txs);
        let mut filters = FilterConfig::for_dataset(&facets, today);
        if self.from.is_some() {
            filters.start_date = self.from;
        }
        if self.to.is_some() {
            filters.end_date = self.to;
        }
        if let Some(t) = self.tx_type {
            filters.tx_type = t;
        }
        if let Some(s) = self.status {
            filters.status = s;
        }
        if !self.industries.is_empty() {
            filters.industries = Some(self.industries.iter().cloned().collect());
        }
        filters.states = self.states.iter().cloned().collect();
        if self.accounts.is_empty() {
            let available = accounts_for_states(txs, &filters.states);
            reconcile_accounts(&mut filters, &available);
        } else {
            filters.accounts = Some(self.accounts.iter().cloned().collect());
        }
        filters
    }
}

fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let source = FileSource::new(path);
    let txs = source
        .load()
        .with_context(|| format!("Failed to load {}", source.describe()))?;
    tracing::info!(rows = txs.len(), path = %path.display(), "cli dataset loaded");
    Ok(txs)
}

/// Load the dataset named in `args` and derive the view under its filters.
fn prepare(args: &CliArgs, usage: &str, now: NaiveDateTime) -> Result<(FilterConfig, DashboardView)> {
    let path = args.dataset(usage)?;
    let txs = load_transactions(&path)?;
    let filters = args.filters(&txs, now.date());
    let view = DashboardView::compute(&txs, &filters, now);
    Ok((filters, view))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn cli_open(args: &[String], db: &mut Database) -> Result<()> {
    let parsed = parse_args(args)?;
    let path = parsed.dataset("flowdash open <file.json|file.csv>")?;
    super::as_tui(db, Some(path))
}

fn cli_summary(args: &[String]) -> Result<()> {
    let parsed = parse_args(args)?;
    let (filters, view) = prepare(&parsed, "flowdash summary <file> [filters]", now())?;
    let s = &view.summary;

    if parsed.json {
        println!("{}", serde_json::to_string_pretty(s)?);
        return Ok(());
    }

    println!("Filters:   {}", filters.describe());
    println!("Matching:  {} transactions", view.transactions.len());
    println!();
    println!(
        "Income:    {:>14}  ({} txns, avg {})",
        format_amount(s.total_income),
        s.income_count,
        format_amount(s.avg_income)
    );
    println!(
        "Expenses:  {:>14}  ({} txns, avg {})",
        format_amount(s.total_expense),
        s.expense_count,
        format_amount(s.avg_expense)
    );
    println!(
        "Balance:   {:>14}  ({} of income)",
        format_amount(s.balance),
        format_percent(s.net_pct)
    );
    println!(
        "Pending:   {:>14}  ({} txns)",
        format_amount(s.pending_total),
        s.pending_count
    );
    Ok(())
}

fn cli_list(args: &[String]) -> Result<()> {
    let parsed = parse_args(args)?;
    let (_, view) = prepare(&parsed, "flowdash list <file> [--page N] [--per-page N] [filters]", now())?;
    let per_page = parsed.per_page.unwrap_or(DEFAULT_PER_PAGE);
    let pages = total_pages(view.transactions.len(), per_page);
    let page = parsed.page.unwrap_or(1).min(pages);
    let rows = page_slice(&view.transactions, page, per_page);

    if parsed.json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No transactions match the filters");
        return Ok(());
    }

    println!(
        "{:<12} {:<32} {:<16} {:<16} {:<5} {:<10} {:>14}",
        "Date", "Description", "Account", "Industry", "State", "Status", "Amount"
    );
    for txn in rows {
        println!(
            "{:<12} {:<32} {:<16} {:<16} {:<5} {:<10} {:>14}",
            format_date(&txn.date),
            truncate(&txn.description, 32),
            truncate(&txn.account, 16),
            truncate(&txn.industry, 16),
            txn.state_label(),
            txn.status,
            format_signed_amount(txn)
        );
    }
    println!();
    println!(
        "Page {page} of {pages} ({} transactions)",
        view.transactions.len()
    );
    Ok(())
}

fn cli_series(args: &[String]) -> Result<()> {
    let mut parsed = parse_args(args)?;
    // `series <file> [flow|balance]`: the kind is the optional second positional.
    let kind = if parsed.positional.len() > 1 {
        parsed.positional.remove(1)
    } else {
        "flow".to_string()
    };
    let (_, view) = prepare(&parsed, "flowdash series <file> [flow|balance] [filters]", now())?;

    match kind.as_str() {
        "flow" => {
            if parsed.json {
                println!("{}", serde_json::to_string_pretty(&view.flow.buckets)?);
                return Ok(());
            }
            println!(
                "Cash flow, {} buckets ({} to {})",
                view.flow.granularity,
                view.flow.window.start.date(),
                view.flow.window.end.date()
            );
            for b in &view.flow.buckets {
                println!(
                    "{:<12} {:>14} {:>14} {:>14}",
                    b.label,
                    format_amount(b.income),
                    format_amount(b.expense),
                    format_amount(b.net())
                );
            }
        }
        "balance" => {
            if parsed.json {
                println!("{}", serde_json::to_string_pretty(&view.balance.buckets)?);
                return Ok(());
            }
            println!(
                "Running balance, {} buckets ({} to {})",
                view.balance.granularity,
                view.balance.window.start.date(),
                view.balance.window.end.date()
            );
            for p in &view.balance.buckets {
                println!(
                    "{:<12} {:>14} {:>14}",
                    p.label,
                    format_amount(p.delta),
                    format_amount(p.balance)
                );
            }
        }
        other => anyhow::bail!("Unknown series '{other}' (flow, balance)"),
    }
    Ok(())
}

fn cli_filters(args: &[String], db: &mut Database) -> Result<()> {
    match args.first().map(String::as_str).unwrap_or("show") {
        "show" => {
            match db::load_dataset_path(&*db)? {
                Some(path) => println!("Dataset: {}", path.display()),
                None => println!("Dataset: (none)"),
            }
            match db::load_filters(&*db)? {
                Some(filters) => println!("Filters: {}", filters.describe()),
                None => println!("Filters: (none saved)"),
            }
        }
        "clear" => {
            db::clear_filters(&*db)?;
            tracing::info!("saved filters cleared from cli");
            println!("Saved filters cleared");
        }
        other => anyhow::bail!("Unknown filters action '{other}' (show, clear)"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
