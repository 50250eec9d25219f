use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::dates::{days_before, end_of_day, parse_timestamp, start_of_day, DateWindow};
use super::filter::matches_categories;
use super::summary::saturating_add;
use crate::models::{FilterConfig, Transaction, TxType};

/// Days covered by the window used when the filters carry no explicit range.
pub const FALLBACK_WINDOW_DAYS: i64 = 30;
/// Longest window still rendered with one bucket per day.
pub const DAILY_MAX_DAYS: i64 = 180;
/// Longest window still rendered with one bucket per week.
pub const WEEKLY_MAX_DAYS: i64 = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Bucket size for a window spanning `days` calendar days.
    pub fn for_days(days: i64) -> Self {
        if days > WEEKLY_MAX_DAYS {
            Self::Month
        } else if days > DAILY_MAX_DAYS {
            Self::Week
        } else {
            Self::Day
        }
    }

    /// First day of the bucket containing `date`. Weeks start on Monday.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => days_before(date, i64::from(date.weekday().num_days_from_monday())),
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Sortable key: `YYYY-MM-DD` for days and weeks, `YYYY-MM` for months.
    pub fn bucket_key(&self, date: NaiveDate) -> String {
        let start = self.bucket_start(date);
        match self {
            Self::Day | Self::Week => start.format("%Y-%m-%d").to_string(),
            Self::Month => start.format("%Y-%m").to_string(),
        }
    }

    /// Short axis label for the bucket starting at `start`.
    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Self::Day | Self::Week => start.format("%d/%m").to_string(),
            Self::Month => start.format("%b %Y").to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "daily",
            Self::Week => "weekly",
            Self::Month => "monthly",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Income and expense totals of one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowBucket {
    pub start: NaiveDate,
    pub key: String,
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

impl FlowBucket {
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Running net balance at the end of one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalancePoint {
    pub start: NaiveDate,
    pub key: String,
    pub label: String,
    /// Net change within this bucket.
    pub delta: Decimal,
    /// Sum of all deltas up to and including this bucket.
    pub balance: Decimal,
}

/// Chronologically ordered buckets plus the window they were cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series<T> {
    pub window: DateWindow,
    pub granularity: Granularity,
    pub buckets: Vec<T>,
}

impl<T> Series<T> {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }
}

/// The window the charts cover.
///
/// An explicit start and end in `filters` give that calendar range. Otherwise
/// the window is the trailing 30 days ending on the later of `now` and the
/// most recent parseable transaction.
pub fn resolve_window(txs: &[Transaction], filters: &FilterConfig, now: NaiveDateTime) -> DateWindow {
    if let (Some(first), Some(last)) = (filters.start_date, filters.end_date) {
        return DateWindow::from_days(first, last);
    }
    let latest = txs.iter().filter_map(|tx| parse_timestamp(&tx.date)).max();
    let anchor = latest.map_or(now, |ts| ts.max(now)).date();
    DateWindow {
        start: start_of_day(days_before(anchor, FALLBACK_WINDOW_DAYS - 1)),
        end: end_of_day(anchor),
    }
}

/// Per-bucket income and expense of completed transactions in the window.
pub fn flow_series(txs: &[Transaction], filters: &FilterConfig, now: NaiveDateTime) -> Series<FlowBucket> {
    let (window, granularity, totals) =
        accumulate(txs, filters, now, |acc: &mut (Decimal, Decimal), tx| match tx.tx_type {
            TxType::Income => acc.0 = saturating_add(acc.0, tx.amount),
            TxType::Expense => acc.1 = saturating_add(acc.1, tx.amount),
        });

    let buckets = totals
        .into_iter()
        .map(|(start, (income, expense))| FlowBucket {
            start,
            key: granularity.bucket_key(start),
            label: granularity.label(start),
            income,
            expense,
        })
        .collect();

    Series {
        window,
        granularity,
        buckets,
    }
}

/// Running net balance across the same buckets as [`flow_series`].
pub fn cumulative_series(
    txs: &[Transaction],
    filters: &FilterConfig,
    now: NaiveDateTime,
) -> Series<BalancePoint> {
    let (window, granularity, deltas) =
        accumulate(txs, filters, now, |acc: &mut Decimal, tx| *acc = saturating_add(*acc, tx.signed_amount()));

    let mut running = Decimal::ZERO;
    let buckets = deltas
        .into_iter()
        .map(|(start, delta)| {
            running = saturating_add(running, delta);
            BalancePoint {
                start,
                key: granularity.bucket_key(start),
                label: granularity.label(start),
                delta,
                balance: running,
            }
        })
        .collect();

    Series {
        window,
        granularity,
        buckets,
    }
}

/// Single pass over `txs`, folding each eligible transaction into the bucket
/// its date falls in. The map is keyed by bucket start, so iteration order
/// is chronological.
fn accumulate<T, F>(
    txs: &[Transaction],
    filters: &FilterConfig,
    now: NaiveDateTime,
    mut fold: F,
) -> (DateWindow, Granularity, BTreeMap<NaiveDate, T>)
where
    T: Default,
    F: FnMut(&mut T, &Transaction),
{
    let window = resolve_window(txs, filters, now);
    let granularity = Granularity::for_days(window.day_count());
    let mut buckets: BTreeMap<NaiveDate, T> = BTreeMap::new();
    if window.is_empty() {
        return (window, granularity, buckets);
    }

    for tx in txs {
        if !tx.is_completed() || !filters.tx_type.accepts(tx.tx_type) {
            continue;
        }
        let Some(ts) = parse_timestamp(&tx.date) else {
            continue;
        };
        if !window.contains(ts) || !matches_categories(tx, filters) {
            continue;
        }
        let start = granularity.bucket_start(ts.date());
        fold(buckets.entry(start).or_default(), tx);
    }

    (window, granularity, buckets)
}

#[cfg(test)]
#[path = "buckets_tests.rs"]
mod tests;
