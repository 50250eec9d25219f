#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::aggregate::fixtures::*;

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn located(id: &str, date: &str, account: &str, state: Option<&str>) -> Transaction {
    let mut tx = income(id, date, dec!(1));
    tx.account = account.into();
    tx.state = state.map(Into::into);
    tx
}

#[test]
fn test_collect_distinct_values_and_span() {
    let mut retail = located("3", "2024-01-02T09:00:00", "Savings", Some("RJ"));
    retail.industry = "Retail".into();
    let txs = vec![
        located("1", "2024-03-10", "Checking", Some("SP")),
        located("2", "not a date", "Checking", None),
        retail,
    ];
    let facets = DatasetFacets::collect(&txs);

    assert_eq!(facets.accounts, set(&["Checking", "Savings"]));
    assert_eq!(facets.industries, set(&["Retail", "Technology"]));
    assert_eq!(facets.states, set(&["RJ", "SP"]));
    assert_eq!(facets.first_date, Some(day(2024, 1, 2)));
    assert_eq!(facets.last_date, Some(day(2024, 3, 10)));
}

#[test]
fn test_collect_empty() {
    let facets = DatasetFacets::collect(&[]);
    assert!(facets.is_empty());
    assert_eq!(facets.first_date, None);
    assert_eq!(facets.last_date, None);
}

#[test]
fn test_accounts_for_states() {
    let txs = vec![
        located("1", "2024-01-01", "Checking", Some("SP")),
        located("2", "2024-01-01", "Savings", Some("RJ")),
        located("3", "2024-01-01", "Broker", None),
    ];
    assert_eq!(accounts_for_states(&txs, &set(&["RJ"])), set(&["Savings"]));
    assert_eq!(
        accounts_for_states(&txs, &BTreeSet::new()),
        set(&["Broker", "Checking", "Savings"])
    );
    assert!(accounts_for_states(&txs, &set(&["MG"])).is_empty());
}

#[test]
fn test_reconcile_keeps_intersection() {
    let mut filters = FilterConfig {
        accounts: Some(set(&["Checking", "Savings"])),
        ..FilterConfig::default()
    };
    reconcile_accounts(&mut filters, &set(&["Savings", "Broker"]));
    assert_eq!(filters.accounts, Some(set(&["Savings"])));
}

#[test]
fn test_reconcile_selects_all_when_intersection_empty() {
    let mut filters = FilterConfig {
        accounts: Some(set(&["Checking"])),
        ..FilterConfig::default()
    };
    reconcile_accounts(&mut filters, &set(&["Savings", "Broker"]));
    assert_eq!(filters.accounts, Some(set(&["Broker", "Savings"])));
}

#[test]
fn test_reconcile_without_available_accounts() {
    let mut filters = FilterConfig {
        accounts: Some(set(&["Checking"])),
        ..FilterConfig::default()
    };
    reconcile_accounts(&mut filters, &BTreeSet::new());
    assert_eq!(filters.accounts, Some(set(&["Checking"])));

    let mut open = FilterConfig::default();
    reconcile_accounts(&mut open, &set(&["Savings"]));
    assert_eq!(open.accounts, None);
}

#[test]
fn test_for_dataset_selects_everything() {
    let txs = vec![
        located("1", "2023-11-05", "Checking", Some("SP")),
        located("2", "2024-02-01", "Savings", Some("RJ")),
    ];
    let facets = DatasetFacets::collect(&txs);
    let filters = FilterConfig::for_dataset(&facets, day(2024, 6, 1));

    assert_eq!(filters.accounts, Some(set(&["Checking", "Savings"])));
    assert_eq!(filters.industries, Some(set(&["Technology"])));
    assert!(filters.states.is_empty());
    assert_eq!(filters.start_date, Some(day(2023, 11, 5)));
    assert_eq!(filters.end_date, Some(day(2024, 2, 1)));
    assert_eq!(crate::aggregate::filter::filter_sorted(&txs, &filters).len(), 2);
}

#[test]
fn test_for_empty_dataset_uses_trailing_range() {
    let filters = FilterConfig::for_dataset(&DatasetFacets::default(), day(2024, 6, 1));
    assert_eq!(filters.start_date, Some(day(2024, 5, 2)));
    assert_eq!(filters.end_date, Some(day(2024, 6, 1)));
    assert_eq!(filters.accounts, None);
    assert_eq!(filters.industries, None);
}
