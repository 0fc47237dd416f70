//! Calendar-date helpers.
//!
//! The server stores dates as ISO datetimes (`1920-01-02T00:00:00.000Z`)
//! while forms edit a plain `YYYY-MM-DD`.

use crate::Error;
use chrono::NaiveDate;

/// Returns the calendar-date part of an ISO datetime string.
///
/// Input without a time component is returned trimmed and unchanged.
#[must_use]
pub fn calendar_date(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.split_once('T') {
        Some((date, _)) => date,
        None => raw,
    }
}

/// Parses a date or datetime string into a calendar date.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, Error> {
    let date = calendar_date(raw);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|source| Error::InvalidDate {
        value: raw.to_string(),
        source,
    })
}
