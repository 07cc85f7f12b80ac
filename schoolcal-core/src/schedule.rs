//! Schedule data model shared by the fetcher, the renderer and the cache.

use std::fmt;

use chrono::NaiveDate;

/// Longest code accepted for either half of a [`SchoolKey`].
const MAX_CODE_LEN: usize = 10;

/// One academic calendar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRecord {
    pub event_date: NaiveDate,
    pub event_name: String,
    /// Free-form details; NEIS often leaves this empty.
    pub event_content: String,
    pub school_name: String,
}

/// The records returned for one school, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleResponse {
    pub school_name: Option<String>,
    pub records: Vec<ScheduleRecord>,
    /// Upstream rows dropped because their date did not parse.
    pub skipped: usize,
}

impl ScheduleResponse {
    pub fn new(records: Vec<ScheduleRecord>) -> Self {
        let school_name = records.first().map(|r| r.school_name.clone());
        ScheduleResponse {
            school_name,
            records,
            skipped: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Identity of a cached calendar: education office code + school code.
///
/// Both codes end up as path segments, so construction only accepts
/// short ASCII codes (alphanumeric office code, numeric school code).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchoolKey {
    office_code: String,
    school_code: String,
}

impl SchoolKey {
    pub fn new(office_code: &str, school_code: &str) -> Option<Self> {
        let office_code = office_code.trim();
        let school_code = school_code.trim();

        let office_ok = is_code(office_code, |b| b.is_ascii_alphanumeric());
        let school_ok = is_code(school_code, |b| b.is_ascii_digit());
        if !office_ok || !school_ok {
            return None;
        }

        Some(SchoolKey {
            office_code: office_code.to_ascii_uppercase(),
            school_code: school_code.to_string(),
        })
    }

    pub fn office_code(&self) -> &str {
        &self.office_code
    }

    pub fn school_code(&self) -> &str {
        &self.school_code
    }
}

impl fmt::Display for SchoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.office_code, self.school_code)
    }
}

fn is_code(s: &str, allowed: impl Fn(u8) -> bool) -> bool {
    !s.is_empty() && s.len() <= MAX_CODE_LEN && s.bytes().all(allowed)
}
