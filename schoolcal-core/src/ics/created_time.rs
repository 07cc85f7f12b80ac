//! The `X-CREATED-TIME` marker: written by the renderer, read back by the
//! cache to decide freshness. Both directions live here so the format cannot
//! drift.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::constants::{CREATED_TIME_FORMAT, CREATED_TIME_PROPERTY};

/// Format an instant as compact UTC, e.g. `20240304T091500Z`.
pub fn format_created_time(at: DateTime<Utc>) -> String {
    at.format(CREATED_TIME_FORMAT).to_string()
}

pub fn parse_created_time(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), CREATED_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Find and parse the `X-CREATED-TIME` line of a rendered calendar.
pub fn extract_created_time(ics: &str) -> Option<DateTime<Utc>> {
    ics.lines()
        .find_map(|line| {
            line.strip_prefix(CREATED_TIME_PROPERTY)
                .and_then(|rest| rest.strip_prefix(':'))
        })
        .and_then(parse_created_time)
}
