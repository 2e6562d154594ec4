//! Date-of-birth helpers.

use chrono::{DateTime, Datelike, NaiveDate};

/// Parses a date of birth as stored by the application: a plain `YYYY-MM-DD` date or an RFC 3339
/// timestamp (the REST layer serializes dates as ISO timestamps).
pub fn parse_dob(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    // `2001-02-03T00:00:00` without an offset.
    raw.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

pub fn birth_year(dob: NaiveDate) -> i32 {
    dob.year()
}

/// Age in completed years on `today`; `None` for dates in the future.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}
