#![allow(clippy::unwrap_used)]

use chrono::Timelike;
use rust_decimal_macros::dec;

use super::*;
use crate::aggregate::fixtures::*;
use crate::models::TypeFilter;

fn sample() -> Vec<Transaction> {
    vec![
        income("1", "2024-01-01", dec!(1000)),
        expense("2", "2024-01-05", dec!(400)),
        income("3", "2024-01-10T08:00:00", dec!(50)),
        expense("4", "2024-01-12", dec!(25.5)),
        income("5", "2024-01-15", dec!(10)),
        expense("6", "2024-01-20", dec!(1)),
        income("7", "2024-03-01", dec!(999)),
    ]
}

#[test]
fn test_compute_dashboard() {
    let txs = sample();
    let filters = range(day(2024, 1, 1), day(2024, 1, 31));
    let view = DashboardView::compute(&txs, &filters, noon(day(2024, 6, 1)));

    assert_eq!(view.transactions.len(), 6);
    assert_eq!(view.transactions[0].id, "6");
    assert_eq!(view.summary.total_income, dec!(1060));
    assert_eq!(view.summary.total_expense, dec!(426.5));
    assert_eq!(view.balance.buckets.last().unwrap().balance, view.summary.balance);

    let recent: Vec<&str> = view.recent().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(recent, vec!["6", "5", "4", "3", "2"]);
}

#[test]
fn test_recent_shorter_than_limit() {
    let txs = vec![income("1", "2024-01-01", dec!(1))];
    let view = DashboardView::compute(&txs, &FilterConfig::default(), noon(day(2024, 1, 2)));
    assert_eq!(view.recent().len(), 1);
}

#[test]
fn test_empty_dataset_view() {
    let view = DashboardView::compute(&[], &FilterConfig::default(), noon(day(2024, 1, 2)));
    assert!(view.transactions.is_empty());
    assert_eq!(view.summary, Summary::default());
    assert!(view.flow.is_empty());
    assert!(view.balance.is_empty());
}

#[test]
fn test_cache_reuses_view() {
    let txs = sample();
    let filters = range(day(2024, 1, 1), day(2024, 1, 31));
    let now = noon(day(2024, 6, 1));
    let mut cache = ViewCache::new();

    let first = cache.get(1, &txs, &filters, now).clone();
    let later = now + chrono::Duration::hours(3);
    let second = cache.get(1, &txs, &filters, later).clone();
    assert_eq!(first, second);
    assert_eq!(cache.computations(), 1);
}

#[test]
fn test_cache_recomputes_on_change() {
    let txs = sample();
    let mut filters = range(day(2024, 1, 1), day(2024, 1, 31));
    let now = noon(day(2024, 6, 1));
    let mut cache = ViewCache::new();

    cache.get(1, &txs, &filters, now);
    filters.tx_type = TypeFilter::Income;
    let income_only = cache.get(1, &txs, &filters, now).summary.clone();
    assert_eq!(income_only.total_expense, dec!(0));
    assert_eq!(cache.computations(), 2);

    cache.get(2, &txs, &filters, now);
    assert_eq!(cache.computations(), 3);

    cache.get(2, &txs, &filters, noon(day(2024, 6, 2)));
    assert_eq!(cache.computations(), 4);

    cache.get(2, &txs, &filters, noon(day(2024, 6, 2)).with_hour(20).unwrap());
    assert_eq!(cache.computations(), 4);
}

#[test]
fn test_cache_current() {
    let txs = sample();
    let filters = FilterConfig::default();
    let mut cache = ViewCache::new();
    assert!(cache.current().is_none());
    let expected = cache.get(1, &txs, &filters, noon(day(2024, 1, 20))).clone();
    assert_eq!(cache.current(), Some(&expected));
}
