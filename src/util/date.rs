//! Calendar date arithmetic shared by every view.
//!
//! Dates are plain calendar days (`NaiveDate`); there is no time-of-day or
//! timezone component, so day differences are always exact.

use chrono::{Datelike, Days, Local, Months, NaiveDate, Weekday};

/// Format a date as `YYYY-MM-DD`, zero-padded.
pub fn format_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a `Y-M-D` date string.
///
/// An empty (or all-whitespace) string yields `reference`. Components do not
/// need zero padding (`2026-1-5` is accepted). Returns `None` when the string
/// is not three integer components or names a day that does not exist.
pub fn parse_date(s: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return Some(reference);
    }
    let mut parts = s.split('-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let day: u32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whole days from `b` to `a` (`a - b`).
pub fn day_diff(a: NaiveDate, b: NaiveDate) -> i64 {
    a.signed_duration_since(b).num_days()
}

/// Shift a date by a signed number of days, saturating at chrono's range.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Shift a date by a signed number of months. Days past the end of the
/// target month clamp to its last day (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// The Sunday on or before `date`.
pub fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as i64;
    add_days(date, -back)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Short `M/D` label used by column headers and calendar cells.
pub fn month_day_label(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// The real wall-clock date, independent of any navigated reference date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
