use chrono::{NaiveDate, NaiveDateTime};

use super::buckets::{cumulative_series, flow_series, BalancePoint, FlowBucket, Series};
use super::filter::filter_sorted;
use super::summary::{summarize, Summary};
use crate::models::{FilterConfig, Transaction};

/// Rows shown in the dashboard's recent activity list.
pub const RECENT_ACTIVITY_LEN: usize = 5;

/// Everything the dashboard and transaction screens render, derived from one
/// dataset and one filter snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    /// Matching transactions, most recent first.
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
    pub flow: Series<FlowBucket>,
    pub balance: Series<BalancePoint>,
}

impl DashboardView {
    pub fn compute(txs: &[Transaction], filters: &FilterConfig, now: NaiveDateTime) -> Self {
        let hits = filter_sorted(txs, filters);
        let summary = summarize(hits.iter().copied());
        Self {
            transactions: hits.into_iter().cloned().collect(),
            summary,
            flow: flow_series(txs, filters, now),
            balance: cumulative_series(txs, filters, now),
        }
    }

    pub fn recent(&self) -> &[Transaction] {
        let n = self.transactions.len().min(RECENT_ACTIVITY_LEN);
        &self.transactions[..n]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    generation: u64,
    filters: FilterConfig,
    today: NaiveDate,
}

/// Memoizes [`DashboardView::compute`].
///
/// The key is the dataset generation, the filter snapshot and the calendar
/// day of `now`. Callers bump the generation whenever the dataset is replaced.
#[derive(Debug, Default)]
pub struct ViewCache {
    entry: Option<(CacheKey, DashboardView)>,
    computations: u64,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        generation: u64,
        txs: &[Transaction],
        filters: &FilterConfig,
        now: NaiveDateTime,
    ) -> &DashboardView {
        let key = CacheKey {
            generation,
            filters: filters.clone(),
            today: now.date(),
        };
        let stale = self.entry.as_ref().map_or(true, |(cached, _)| *cached != key);
        if stale {
            tracing::debug!(generation, rows = txs.len(), "recomputing dashboard view");
            self.computations += 1;
            self.entry = None;
        }
        let (_, view) = self
            .entry
            .get_or_insert_with(|| (key, DashboardView::compute(txs, filters, now)));
        view
    }

    /// The last computed view, if any.
    pub fn current(&self) -> Option<&DashboardView> {
        self.entry.as_ref().map(|(_, view)| view)
    }

    /// How many times the view has been recomputed.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
