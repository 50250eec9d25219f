#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, Timelike};

use super::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── parse_timestamp ───────────────────────────────────────────

#[test]
fn test_parse_plain_date_is_midnight() {
    let ts = parse_timestamp("2024-01-05").unwrap();
    assert_eq!(ts, start_of_day(day(2024, 1, 5)));
}

#[test]
fn test_parse_datetime_variants() {
    let expected = day(2024, 3, 9).and_hms_opt(14, 30, 0).unwrap();
    assert_eq!(parse_timestamp("2024-03-09T14:30:00").unwrap(), expected);
    assert_eq!(parse_timestamp("2024-03-09T14:30").unwrap(), expected);
    assert_eq!(parse_timestamp("2024-03-09 14:30:00").unwrap(), expected);
}

#[test]
fn test_parse_fractional_seconds() {
    let ts = parse_timestamp("2024-03-09T23:59:59.999").unwrap();
    assert_eq!(ts, end_of_day(day(2024, 3, 9)));
}

#[test]
fn test_parse_rfc3339_keeps_wall_clock() {
    let ts = parse_timestamp("2024-03-09T22:15:00-03:00").unwrap();
    assert_eq!(ts.date(), day(2024, 3, 9));
    assert_eq!(ts.hour(), 22);

    let utc = parse_timestamp("2024-03-09T08:00:00.000Z").unwrap();
    assert_eq!(utc.hour(), 8);
}

#[test]
fn test_parse_trims_whitespace() {
    assert!(parse_timestamp("  2024-01-01  ").is_some());
}

#[test]
fn test_parse_malformed() {
    assert!(parse_timestamp("").is_none());
    assert!(parse_timestamp("yesterday").is_none());
    assert!(parse_timestamp("2024-13-01").is_none());
    assert!(parse_timestamp("2024-02-30").is_none());
    assert!(parse_timestamp("01/05/2024").is_none());
}

// ── Day boundaries ────────────────────────────────────────────

#[test]
fn test_end_of_day_is_last_millisecond() {
    let eod = end_of_day(day(2024, 1, 31));
    assert_eq!(eod.hour(), 23);
    assert_eq!(eod.minute(), 59);
    assert_eq!(eod.second(), 59);
    assert_eq!(eod.nanosecond(), 999_000_000);
    assert_eq!(eod + chrono::Duration::milliseconds(1), start_of_day(day(2024, 2, 1)));
}

// ── DateWindow ────────────────────────────────────────────────

#[test]
fn test_window_day_count_single_day() {
    let w = DateWindow::from_days(day(2024, 1, 1), day(2024, 1, 1));
    assert_eq!(w.day_count(), 1);
}

#[test]
fn test_window_day_count_month() {
    let w = DateWindow::from_days(day(2024, 1, 1), day(2024, 1, 31));
    assert_eq!(w.day_count(), 31);
}

#[test]
fn test_window_day_count_leap_year() {
    let w = DateWindow::from_days(day(2024, 1, 1), day(2024, 12, 31));
    assert_eq!(w.day_count(), 366);
}

#[test]
fn test_window_inverted_is_empty() {
    let w = DateWindow::from_days(day(2024, 2, 1), day(2024, 1, 1));
    assert!(w.is_empty());
    assert_eq!(w.day_count(), 0);
    assert!(!w.contains(start_of_day(day(2024, 1, 15))));
}

#[test]
fn test_window_contains_bounds() {
    let w = DateWindow::from_days(day(2024, 1, 1), day(2024, 1, 31));
    assert!(w.contains(start_of_day(day(2024, 1, 1))));
    assert!(w.contains(end_of_day(day(2024, 1, 31))));
    assert!(!w.contains(start_of_day(day(2024, 2, 1))));
    assert!(!w.contains(end_of_day(day(2023, 12, 31))));
}

#[test]
fn test_end_of_day_at_calendar_limit() {
    let last = end_of_day(NaiveDate::MAX);
    assert_eq!(last.date(), NaiveDate::MAX);
    assert_eq!((last.hour(), last.minute(), last.second()), (23, 59, 59));
    assert!(DateWindow::from_days(NaiveDate::MAX, NaiveDate::MAX).contains(last));
}

#[test]
fn test_days_before_clamps() {
    assert_eq!(days_before(day(2024, 3, 1), 1), day(2024, 2, 29));
    assert_eq!(days_before(NaiveDate::MIN, 1), NaiveDate::MIN);
    assert_eq!(days_before(day(2024, 3, 1), i64::MAX), NaiveDate::MIN);
}
