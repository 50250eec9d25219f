use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TxType};

/// Headline totals for a set of transactions.
///
/// Income and expense figures count completed transactions only. Pending
/// transactions are tallied separately regardless of type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
    pub balance: Decimal,
    /// Balance as a percentage of income. Zero when there is no income.
    pub net_pct: Decimal,
    pub avg_income: Decimal,
    pub avg_expense: Decimal,
    pub pending_count: usize,
    pub pending_total: Decimal,
}

pub fn summarize<'a, I>(txs: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut s = Summary::default();
    for tx in txs {
        if tx.is_pending() {
            s.pending_count += 1;
            s.pending_total = saturating_add(s.pending_total, tx.amount);
            continue;
        }
        match tx.tx_type {
            TxType::Income => {
                s.total_income = saturating_add(s.total_income, tx.amount);
                s.income_count += 1;
            }
            TxType::Expense => {
                s.total_expense = saturating_add(s.total_expense, tx.amount);
                s.expense_count += 1;
            }
        }
    }

    s.balance = s.total_income - s.total_expense;
    s.net_pct = if s.total_income > Decimal::ZERO {
        s.balance
            .checked_div(s.total_income)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or_default()
    } else {
        Decimal::ZERO
    };
    s.avg_income = average(s.total_income, s.income_count);
    s.avg_expense = average(s.total_expense, s.expense_count);
    s
}

/// `total + amount`, pinned to the representable range on overflow.
pub(crate) fn saturating_add(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        tracing::warn!(%total, %amount, "decimal overflow, total saturated");
        if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total
        .checked_div(Decimal::from(count))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
