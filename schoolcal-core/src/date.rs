//! Compact `YYYYMMDD` date codec used by NEIS.

use chrono::{Datelike, NaiveDate};

use crate::error::{SchoolCalError, SchoolCalResult};

/// Parse an 8-digit `YYYYMMDD` string into a calendar date.
///
/// Out-of-range months and days are rejected rather than rolled over into
/// the neighbouring month.
pub fn parse_compact_date(s: &str) -> SchoolCalResult<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SchoolCalError::MalformedDate(s.to_string()));
    }

    let field = |range: std::ops::Range<usize>| -> SchoolCalResult<u32> {
        s[range]
            .parse()
            .map_err(|_| SchoolCalError::MalformedDate(s.to_string()))
    };

    let year = field(0..4)? as i32;
    let month = field(4..6)?;
    let day = field(6..8)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| SchoolCalError::MalformedDate(s.to_string()))
}

/// Format a date as zero-padded `YYYYMMDD`.
pub fn format_compact_date(date: NaiveDate) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}
