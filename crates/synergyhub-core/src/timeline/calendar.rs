//! Month arithmetic on UTC timestamps.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};

/// Midnight UTC on the first day of the month containing `at`.
pub fn start_of_month(at: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(at.year(), at.month(), 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(at)
}

/// Last millisecond of the month containing `at`.
pub fn end_of_month(at: DateTime<Utc>) -> DateTime<Utc> {
    add_months(start_of_month(at), 1) - Duration::milliseconds(1)
}

/// Shift by whole calendar months, saturating at the representable range.
pub fn add_months(at: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    at.checked_add_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `YYYY-MM` key for a month.
pub fn month_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}
