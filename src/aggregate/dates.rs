use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a transaction date into a timezone-naive instant.
///
/// Accepts a bare `YYYY-MM-DD` (read as midnight), ISO-8601 datetimes with a
/// `T` or space separator, and RFC 3339 with an offset, in which case the
/// wall-clock part is kept. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last millisecond of `date` (23:59:59.999).
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| start_of_day(date))
}

/// `date` moved back by `days`, clamped to the earliest representable day.
pub fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|d| date.checked_sub_signed(d))
        .unwrap_or(NaiveDate::MIN)
}

/// Inclusive time window. A window whose end precedes its start is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    /// Window covering whole calendar days, start-of-day through end-of-day.
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }

    /// Number of calendar days spanned, at least 1. Empty windows span 0.
    pub fn day_count(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        let span_ms = (self.end - self.start).num_milliseconds() + 1;
        ((span_ms + DAY_MS - 1) / DAY_MS).max(1)
    }
}

#[cfg(test)]
#[path = "dates_tests.rs"]
mod tests;
