use chrono::NaiveDateTime;
use std::collections::BTreeSet;

use super::dates::{end_of_day, parse_timestamp, start_of_day};
use crate::models::{FilterConfig, Transaction};

/// Whether `tx` passes every predicate of `filters`.
///
/// Transactions whose date does not parse never match.
pub fn matches(tx: &Transaction, filters: &FilterConfig) -> bool {
    if !filters.tx_type.accepts(tx.tx_type) || !filters.status.accepts(tx.status) {
        return false;
    }
    match parse_timestamp(&tx.date) {
        Some(ts) => within_bounds(ts, filters) && matches_categories(tx, filters),
        None => false,
    }
}

/// The subset of `txs` passing `filters`, most recent first.
/// Equal timestamps keep their input order.
pub fn filter_sorted<'a, I>(txs: I, filters: &FilterConfig) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut hits: Vec<(NaiveDateTime, &'a Transaction)> = txs
        .into_iter()
        .filter(|tx| matches(tx, filters))
        .filter_map(|tx| parse_timestamp(&tx.date).map(|ts| (ts, tx)))
        .collect();
    hits.sort_by(|a, b| b.0.cmp(&a.0));
    hits.into_iter().map(|(_, tx)| tx).collect()
}

/// Start bound is start-of-day, end bound is end-of-day. A missing bound is open.
pub(crate) fn within_bounds(ts: NaiveDateTime, filters: &FilterConfig) -> bool {
    let after_start = filters.start_date.map_or(true, |d| ts >= start_of_day(d));
    let before_end = filters.end_date.map_or(true, |d| ts <= end_of_day(d));
    after_start && before_end
}

/// Account, industry and state membership.
pub(crate) fn matches_categories(tx: &Transaction, filters: &FilterConfig) -> bool {
    in_selection(&filters.accounts, &tx.account)
        && in_selection(&filters.industries, &tx.industry)
        && (filters.states.is_empty() || filters.states.contains(tx.state_label()))
}

fn in_selection(selection: &Option<BTreeSet<String>>, value: &str) -> bool {
    selection.as_ref().map_or(true, |set| set.contains(value))
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
