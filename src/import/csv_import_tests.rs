#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;
use std::io::Write;

fn make_csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// ── parse_decimal ─────────────────────────────────────────────

#[test]
fn test_parse_decimal_basic() {
    assert_eq!(parse_decimal("100.50"), Some(dec!(100.50)));
    assert_eq!(parse_decimal("42"), Some(dec!(42)));
}

#[test]
fn test_parse_decimal_with_currency() {
    assert_eq!(parse_decimal("$1,234.56"), Some(dec!(1234.56)));
    assert_eq!(parse_decimal("$1,234,567.89"), Some(dec!(1234567.89)));
}

#[test]
fn test_parse_decimal_parentheses_negative() {
    assert_eq!(parse_decimal("(500.00)"), Some(dec!(-500.00)));
}

#[test]
fn test_parse_decimal_empty_or_invalid() {
    assert_eq!(parse_decimal(""), None);
    assert_eq!(parse_decimal("  "), None);
    assert_eq!(parse_decimal("not_a_number"), None);
}

// ── parse_type / parse_status ─────────────────────────────────

#[test]
fn test_parse_type_aliases() {
    assert_eq!(parse_type("Income"), Some(TxType::Income));
    assert_eq!(parse_type("deposit"), Some(TxType::Income));
    assert_eq!(parse_type("WITHDRAW"), Some(TxType::Expense));
    assert_eq!(parse_type("transfer"), None);
}

#[test]
fn test_parse_status_aliases() {
    assert_eq!(parse_status("Completed"), Some(TxStatus::Completed));
    assert_eq!(parse_status("pending"), Some(TxStatus::Pending));
    assert_eq!(parse_status("failed"), None);
}

// ── read_csv ──────────────────────────────────────────────────

#[test]
fn test_read_csv() {
    let file = make_csv_file(
        "id,date,description,amount,type,status,account,industry,state,category,method\n\
         1,2024-01-15,Salary,\"$5,000.00\",income,completed,Checking,Technology,SP,Payroll,TED\n\
         2,2024-01-16T09:30:00,Rent,1200,expense,pending,Checking,Real Estate,,Housing,PIX\n",
    );
    let txs = read_csv(file.path()).unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].amount, dec!(5000.00));
    assert_eq!(txs[0].state.as_deref(), Some("SP"));
    assert!(txs[0].is_income());
    assert!(txs[1].is_pending());
    assert_eq!(txs[1].state, None);
    assert_eq!(txs[1].industry, "Real Estate");
}

#[test]
fn test_read_csv_any_column_order_and_missing_optionals() {
    let file = make_csv_file(
        "status, type , amount,date,id,extra\n\
         completed,expense,12.5,2024-02-01,x1,ignored\n",
    );
    let txs = read_csv(file.path()).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].id, "x1");
    assert_eq!(txs[0].amount, dec!(12.5));
    assert_eq!(txs[0].account, "");
    assert_eq!(txs[0].description, "");
}

#[test]
fn test_read_csv_bad_amount_reports_line() {
    let file = make_csv_file(
        "id,date,amount,type,status\n\
         1,2024-01-15,10,income,completed\n\
         2,2024-01-16,abc,income,completed\n",
    );
    let err = read_csv(file.path()).unwrap_err();
    assert!(matches!(&err, SourceError::Row { line: 3, reason } if reason.contains("abc")));
    assert_eq!(err.to_string(), "Row 3: failed to parse amount 'abc'");
}

#[test]
fn test_read_csv_unknown_type() {
    let file = make_csv_file("id,date,amount,type,status\n1,2024-01-15,10,refund,completed\n");
    assert!(matches!(read_csv(file.path()), Err(SourceError::Row { line: 2, .. })));
}

#[test]
fn test_read_csv_missing_required_column() {
    let file = make_csv_file("id,date,amount\n1,2024-01-15,10\n");
    assert!(matches!(read_csv(file.path()), Err(SourceError::Csv(_))));
}

#[test]
fn test_read_csv_header_only() {
    let file = make_csv_file("id,date,amount,type,status\n");
    assert!(read_csv(file.path()).unwrap().is_empty());
}
