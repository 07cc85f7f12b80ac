//! Date window requested from NEIS.

use chrono::{Datelike, Days, Months, NaiveDate, Utc};

use crate::date::format_compact_date;

/// Half-open range `[from, to)` covering one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ScheduleWindow {
    /// January 1 of `date`'s year to January 1 of the following year.
    pub fn containing(date: NaiveDate) -> Self {
        let from = date - Days::new(u64::from(date.ordinal0()));
        let to = from
            .checked_add_months(Months::new(12))
            .unwrap_or(NaiveDate::MAX);
        ScheduleWindow { from, to }
    }

    /// The window for the current year in Korea.
    pub fn current() -> Self {
        let today = Utc::now()
            .with_timezone(&chrono_tz::Asia::Seoul)
            .date_naive();
        Self::containing(today)
    }

    pub fn from_param(&self) -> String {
        format_compact_date(self.from)
    }

    pub fn to_param(&self) -> String {
        format_compact_date(self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_spans_calendar_year() {
        let window = ScheduleWindow::containing(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        assert_eq!(window.from_param(), "20240101");
        assert_eq!(window.to_param(), "20250101");
    }

    #[test]
    fn test_window_on_year_boundaries() {
        let first = ScheduleWindow::containing(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(first.from_param(), "20250101");
        let last = ScheduleWindow::containing(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(last.from_param(), "20240101");
        assert_eq!(last.to_param(), "20250101");
    }
}
