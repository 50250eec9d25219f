use chrono::NaiveDate;
use std::collections::BTreeSet;

use super::dates::parse_timestamp;
use crate::models::{FilterConfig, Transaction};

/// Distinct classification values and the date span observed in a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetFacets {
    pub accounts: BTreeSet<String>,
    pub industries: BTreeSet<String>,
    /// Non-empty state labels only.
    pub states: BTreeSet<String>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl DatasetFacets {
    pub fn collect(txs: &[Transaction]) -> Self {
        let mut facets = Self::default();
        for tx in txs {
            facets.accounts.insert(tx.account.clone());
            facets.industries.insert(tx.industry.clone());
            if !tx.state_label().is_empty() {
                facets.states.insert(tx.state_label().to_string());
            }
            if let Some(ts) = parse_timestamp(&tx.date) {
                let date = ts.date();
                facets.first_date = Some(facets.first_date.map_or(date, |d| d.min(date)));
                facets.last_date = Some(facets.last_date.map_or(date, |d| d.max(date)));
            }
        }
        facets
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Accounts seen in any of `states`. With no state selected, every account.
pub fn accounts_for_states(txs: &[Transaction], states: &BTreeSet<String>) -> BTreeSet<String> {
    txs.iter()
        .filter(|tx| states.is_empty() || states.contains(tx.state_label()))
        .map(|tx| tx.account.clone())
        .collect()
}

/// Narrow the account selection to what `available` still offers.
///
/// Keeps the selected accounts that remain available. When none remain, every
/// available account is selected. An empty `available` or an unconstrained
/// selection is left as is.
pub fn reconcile_accounts(filters: &mut FilterConfig, available: &BTreeSet<String>) {
    if available.is_empty() {
        return;
    }
    let Some(selected) = filters.accounts.as_mut() else {
        return;
    };
    selected.retain(|account| available.contains(account));
    if selected.is_empty() {
        *selected = available.clone();
    }
}

#[cfg(test)]
#[path = "facets_tests.rs"]
mod tests;
