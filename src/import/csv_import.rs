use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use super::SourceError;
use crate::models::{Transaction, TxStatus, TxType};

/// One CSV record. Amount, type and status stay text so that bank-style
/// values (`$1,234.56`, `(12.00)`, `Income`) can be cleaned up first.
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    date: String,
    #[serde(default)]
    description: String,
    amount: String,
    #[serde(rename = "type")]
    tx_type: String,
    status: String,
    #[serde(default)]
    account: String,
    #[serde(default)]
    industry: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    method: String,
}

/// Read a headed CSV whose columns are named after the transaction fields.
/// Column order does not matter and unknown columns are ignored.
pub(crate) fn read_csv(path: &Path) -> Result<Vec<Transaction>, SourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut transactions = Vec::new();
    for (i, result) in rdr.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header
        let line = i + 2;
        let row = result?;
        transactions.push(into_transaction(row, line)?);
    }
    Ok(transactions)
}

fn into_transaction(row: CsvRow, line: usize) -> Result<Transaction, SourceError> {
    let invalid = |reason: String| SourceError::Row { line, reason };

    let amount = parse_decimal(&row.amount)
        .ok_or_else(|| invalid(format!("failed to parse amount '{}'", row.amount)))?;
    let tx_type = parse_type(&row.tx_type)
        .ok_or_else(|| invalid(format!("unknown type '{}'", row.tx_type)))?;
    let status = parse_status(&row.status)
        .ok_or_else(|| invalid(format!("unknown status '{}'", row.status)))?;

    Ok(Transaction {
        id: row.id,
        date: row.date,
        description: row.description,
        amount,
        tx_type,
        status,
        account: row.account,
        industry: row.industry,
        state: (!row.state.is_empty()).then_some(row.state),
        category: row.category,
        method: row.method,
    })
}

fn parse_type(s: &str) -> Option<TxType> {
    match s.trim().to_lowercase().as_str() {
        "income" | "deposit" | "credit" => Some(TxType::Income),
        "expense" | "withdraw" | "debit" => Some(TxType::Expense),
        _ => None,
    }
}

fn parse_status(s: &str) -> Option<TxStatus> {
    match s.trim().to_lowercase().as_str() {
        "completed" | "complete" | "done" => Some(TxStatus::Completed),
        "pending" => Some(TxStatus::Pending),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let cleaned = s
        .replace(['$', ','], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
