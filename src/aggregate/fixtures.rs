#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::models::{FilterConfig, Transaction, TxStatus, TxType};

pub(crate) fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn noon(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(12, 0, 0).unwrap()
}

pub(crate) fn txn(
    id: &str,
    date: &str,
    amount: Decimal,
    tx_type: TxType,
    status: TxStatus,
) -> Transaction {
    Transaction {
        id: id.into(),
        date: date.into(),
        description: format!("Transaction {id}"),
        amount,
        tx_type,
        status,
        account: "Checking".into(),
        industry: "Technology".into(),
        state: Some("SP".into()),
        category: "General".into(),
        method: "PIX".into(),
    }
}

pub(crate) fn income(id: &str, date: &str, amount: Decimal) -> Transaction {
    txn(id, date, amount, TxType::Income, TxStatus::Completed)
}

pub(crate) fn expense(id: &str, date: &str, amount: Decimal) -> Transaction {
    txn(id, date, amount, TxType::Expense, TxStatus::Completed)
}

pub(crate) fn pending(id: &str, date: &str, amount: Decimal, tx_type: TxType) -> Transaction {
    txn(id, date, amount, tx_type, TxStatus::Pending)
}

/// Explicit inclusive range with no categorical constraint.
pub(crate) fn range(first: NaiveDate, last: NaiveDate) -> FilterConfig {
    FilterConfig {
        start_date: Some(first),
        end_date: Some(last),
        ..FilterConfig::default()
    }
}
