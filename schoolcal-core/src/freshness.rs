//! Cache freshness policy for rendered calendars.

use chrono::{DateTime, Duration, Utc};

use crate::ics::extract_created_time;

/// A document rendered at `generated_at` is fresh while it is younger than
/// `cache_days` whole days.
pub fn is_fresh(generated_at: DateTime<Utc>, now: DateTime<Utc>, cache_days: u32) -> bool {
    now.signed_duration_since(generated_at) < Duration::days(i64::from(cache_days))
}

/// Classification of a stored calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh(DateTime<Utc>),
    Stale(DateTime<Utc>),
    /// No document, or one without a readable creation marker.
    Absent,
}

impl Freshness {
    pub fn of_document(content: Option<&str>, now: DateTime<Utc>, cache_days: u32) -> Self {
        let Some(generated_at) = content.and_then(extract_created_time) else {
            return Freshness::Absent;
        };

        if is_fresh(generated_at, now, cache_days) {
            Freshness::Fresh(generated_at)
        } else {
            Freshness::Stale(generated_at)
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Freshness::Fresh(_))
    }
}
