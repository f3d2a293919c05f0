//! Merging and splitting of due dates.

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};

/// Combine a `YYYY-MM-DD` date and an optional `HH:MM[:SS]` time into one
/// instant, read as UTC.
///
/// Returns `None` when the date is missing or the result does not parse;
/// callers treat that as "could not schedule".
pub fn compose(date: Option<&str>, time: Option<&str>) -> Option<DateTime<Utc>> {
    let date = date.map(str::trim).filter(|d| !d.is_empty())?;
    let time = time
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("00:00");

    let time = if time.len() == 5 {
        format!("{}:00", time)
    } else {
        time.to_string()
    };

    let composite = format!("{}T{}", date, time);
    NaiveDateTime::parse_from_str(&composite, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Split an instant into `YYYY-MM-DD` and, unless the time is exactly
/// midnight, `HH:MM`.
pub fn split(due: DateTime<Utc>) -> (String, Option<String>) {
    let date = due.format("%Y-%m-%d").to_string();
    let time = (due.time() != NaiveTime::MIN).then(|| due.format("%H:%M").to_string());
    (date, time)
}
