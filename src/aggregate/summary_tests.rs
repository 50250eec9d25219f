#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::aggregate::fixtures::*;

#[test]
fn test_income_and_expense_scenario() {
    let txs = vec![
        income("1", "2024-01-01", dec!(100)),
        expense("2", "2024-01-05", dec!(40)),
    ];
    let s = summarize(&txs);
    assert_eq!(s.total_income, dec!(100));
    assert_eq!(s.total_expense, dec!(40));
    assert_eq!(s.balance, dec!(60));
    assert_eq!(s.net_pct, dec!(60));
    assert_eq!(s.income_count, 1);
    assert_eq!(s.expense_count, 1);
    assert_eq!(s.pending_count, 0);
}

#[test]
fn test_empty_input_is_all_zero() {
    let txs: Vec<Transaction> = Vec::new();
    assert_eq!(summarize(&txs), Summary::default());
}

#[test]
fn test_pending_excluded_from_totals() {
    let txs = vec![pending("1", "2024-01-01", dec!(50), TxType::Income)];
    let s = summarize(&txs);
    assert_eq!(s.pending_count, 1);
    assert_eq!(s.pending_total, dec!(50));
    assert_eq!(s.total_income, Decimal::ZERO);
    assert_eq!(s.total_expense, Decimal::ZERO);
    assert_eq!(s.income_count, 0);
}

#[test]
fn test_pending_counts_both_types() {
    let txs = vec![
        pending("1", "2024-01-01", dec!(50), TxType::Income),
        pending("2", "2024-01-02", dec!(20.25), TxType::Expense),
        income("3", "2024-01-03", dec!(10)),
    ];
    let s = summarize(&txs);
    assert_eq!(s.pending_count, 2);
    assert_eq!(s.pending_total, dec!(70.25));
    assert_eq!(s.total_income, dec!(10));
}

#[test]
fn test_no_income_gives_zero_pct() {
    let txs = vec![expense("1", "2024-01-01", dec!(40))];
    let s = summarize(&txs);
    assert_eq!(s.balance, dec!(-40));
    assert_eq!(s.net_pct, Decimal::ZERO);
    assert_eq!(s.avg_income, Decimal::ZERO);
    assert_eq!(s.avg_expense, dec!(40));
}

#[test]
fn test_negative_balance_pct() {
    let txs = vec![
        income("1", "2024-01-01", dec!(50)),
        expense("2", "2024-01-02", dec!(75)),
    ];
    let s = summarize(&txs);
    assert_eq!(s.balance, dec!(-25));
    assert_eq!(s.net_pct, dec!(-50));
}

#[test]
fn test_averages() {
    let txs = vec![
        income("1", "2024-01-01", dec!(100)),
        income("2", "2024-01-02", dec!(50)),
        expense("3", "2024-01-03", dec!(30)),
        expense("4", "2024-01-04", dec!(10)),
        expense("5", "2024-01-05", dec!(20)),
    ];
    let s = summarize(&txs);
    assert_eq!(s.avg_income, dec!(75));
    assert_eq!(s.avg_expense, dec!(20));
}

#[test]
fn test_cents_accumulate_exactly() {
    let txs: Vec<Transaction> = (0..1000)
        .map(|i| income(&i.to_string(), "2024-01-01", dec!(0.10)))
        .collect();
    let s = summarize(&txs);
    assert_eq!(s.total_income, dec!(100.00));
    assert_eq!(s.balance, s.total_income - s.total_expense);
}

#[test]
fn test_accepts_borrowed_subsets() {
    let txs = vec![
        income("1", "2024-01-01", dec!(100)),
        expense("2", "2024-01-05", dec!(40)),
    ];
    let refs: Vec<&Transaction> = txs.iter().filter(|t| t.is_expense()).collect();
    let s = summarize(refs);
    assert_eq!(s.total_expense, dec!(40));
    assert_eq!(s.total_income, Decimal::ZERO);
}

#[test]
fn test_totals_saturate_instead_of_overflowing() {
    let txs = vec![
        income("1", "2024-01-01", Decimal::MAX),
        income("2", "2024-01-02", Decimal::MAX),
        expense("3", "2024-01-03", dec!(1)),
    ];
    let s = summarize(&txs);
    assert_eq!(s.total_income, Decimal::MAX);
    assert_eq!(s.balance, Decimal::MAX - dec!(1));
    assert_eq!(s.income_count, 2);
    assert_eq!(saturating_add(Decimal::MIN, dec!(-1)), Decimal::MIN);
}
