//! Decoding of the NEIS `SchoolSchedule` JSON envelope.
//!
//! A successful reply looks like
//! `{"SchoolSchedule": [{"head": [...]}, {"row": [...]}]}`; a query that
//! matched nothing, or was rejected, is `{"RESULT": {"CODE": .., "MESSAGE": ..}}`.

use serde::Deserialize;
use tracing::warn;

use crate::constants::{NEIS_NO_DATA, NEIS_OK};
use crate::date::parse_compact_date;
use crate::error::{SchoolCalError, SchoolCalResult};
use crate::schedule::{ScheduleRecord, ScheduleResponse};

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "SchoolSchedule")]
    school_schedule: Option<Vec<Section>>,
    #[serde(rename = "RESULT")]
    result: Option<NeisResult>,
}

#[derive(Deserialize)]
struct Section {
    row: Option<Vec<ScheduleRow>>,
}

#[derive(Deserialize)]
struct NeisResult {
    #[serde(rename = "CODE")]
    code: String,
    #[serde(rename = "MESSAGE", default)]
    message: String,
}

#[derive(Deserialize)]
struct ScheduleRow {
    #[serde(rename = "AA_YMD", default)]
    date: Option<String>,
    #[serde(rename = "EVENT_NM", default)]
    event_name: Option<String>,
    #[serde(rename = "EVENT_CNTNT", default)]
    event_content: Option<String>,
    #[serde(rename = "SCHUL_NM", default)]
    school_name: Option<String>,
}

impl ScheduleRow {
    fn into_record(self) -> SchoolCalResult<ScheduleRecord> {
        let date = self
            .date
            .ok_or_else(|| SchoolCalError::MalformedDate("missing AA_YMD".into()))?;
        Ok(ScheduleRecord {
            event_date: parse_compact_date(date.trim())?,
            event_name: self.event_name.unwrap_or_default(),
            event_content: self.event_content.unwrap_or_default(),
            school_name: self.school_name.unwrap_or_default(),
        })
    }
}

/// Decode a NEIS `SchoolSchedule` response body.
///
/// Rows with an unparseable date are skipped and counted in
/// [`ScheduleResponse::skipped`]. A "no data" result yields an empty
/// response; any other NEIS result code is an upstream error.
pub fn decode_schedule(body: &str) -> SchoolCalResult<ScheduleResponse> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| SchoolCalError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let Some(sections) = envelope.school_schedule else {
        return match envelope.result {
            Some(result) if result.code == NEIS_NO_DATA || result.code == NEIS_OK => {
                Ok(ScheduleResponse::default())
            }
            Some(result) => Err(SchoolCalError::Upstream(format!(
                "{} ({})",
                result.message, result.code
            ))),
            None => Err(SchoolCalError::MalformedResponse(
                "missing SchoolSchedule section".into(),
            )),
        };
    };

    if sections.iter().all(|section| section.row.is_none()) {
        return Err(SchoolCalError::MalformedResponse(
            "SchoolSchedule has no row section".into(),
        ));
    }

    // The school name comes from the row section (the second one); the
    // head section never carries rows.
    let school_name = sections
        .get(1)
        .and_then(|section| section.row.as_ref())
        .and_then(|rows| rows.first())
        .and_then(|row| row.school_name.clone());

    let mut records = Vec::new();
    let mut skipped = 0;
    for row in sections.into_iter().filter_map(|section| section.row).flatten() {
        match row.into_record() {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(error = %e, "skipping schedule row");
                skipped += 1;
            }
        }
    }

    let school_name = school_name.or_else(|| records.first().map(|r| r.school_name.clone()));

    Ok(ScheduleResponse {
        school_name,
        records,
        skipped,
    })
}
