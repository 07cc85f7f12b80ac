//! Rendering of a school's schedule into a complete VCALENDAR.

use chrono::{DateTime, Utc};

use crate::constants::{CALNAME_SUFFIX, CREATED_TIME_PROPERTY, PRODID, TZID};
use crate::date::format_compact_date;
use crate::ics::created_time::format_created_time;
use crate::ics::writer::IcsWriter;
use crate::schedule::ScheduleRecord;

/// Render `records` as an ICS document.
///
/// Every record becomes an all-day VEVENT with a display alarm one day
/// before. Events carry no DTEND: a date-only DTSTART already spans the
/// whole day. `generated_at` is embedded as `X-CREATED-TIME` (and used as
/// DTSTAMP) at second precision.
pub fn render_calendar(
    school_display_name: &str,
    records: &[ScheduleRecord],
    generated_at: DateTime<Utc>,
) -> String {
    let stamp = format_created_time(generated_at);
    let mut ics = IcsWriter::new();

    ics.begin("VCALENDAR")
        .property("VERSION", "2.0")
        .property("PRODID", PRODID)
        .property("CALSCALE", "GREGORIAN")
        .text(
            "X-WR-CALNAME",
            &format!("{school_display_name} {CALNAME_SUFFIX}"),
        )
        .property("X-WR-TIMEZONE", TZID);

    write_timezone(&mut ics);

    ics.property(CREATED_TIME_PROPERTY, &stamp);

    for (index, record) in records.iter().enumerate() {
        write_event(&mut ics, record, index, &stamp);
    }

    ics.end("VCALENDAR");
    ics.finish()
}

/// Korea has observed no DST since 1988, so a single STANDARD rule suffices.
fn write_timezone(ics: &mut IcsWriter) {
    ics.begin("VTIMEZONE")
        .property("TZID", TZID)
        .property("TZURL", "https://www.tzurl.org/zoneinfo-outlook/Asia/Seoul")
        .property("X-LIC-LOCATION", TZID)
        .begin("STANDARD")
        .property("DTSTART", "19700101T000000")
        .property("TZNAME", "KST")
        .property("TZOFFSETFROM", "+0900")
        .property("TZOFFSETTO", "+0900")
        .end("STANDARD")
        .end("VTIMEZONE");
}

fn write_event(ics: &mut IcsWriter, record: &ScheduleRecord, index: usize, stamp: &str) {
    let date = format_compact_date(record.event_date);

    ics.begin("VEVENT")
        .text("UID", &format!("{date}-{index}@{}", record.school_name))
        .property("DTSTAMP", stamp)
        .property_with_params("DTSTART", &[("VALUE", "DATE")], &date)
        .property("TRANSP", "OPAQUE")
        .property("X-MICROSOFT-CDO-BUSYSTATUS", "BUSY")
        .property("CLASS", "PUBLIC")
        .begin("VALARM")
        .property("ACTION", "DISPLAY")
        .text("DESCRIPTION", &record.event_name)
        .property("TRIGGER", "-P1D")
        .end("VALARM")
        .text("SUMMARY", &record.event_name)
        .text("DESCRIPTION", &record.event_content)
        .text("LOCATION", &record.school_name)
        .end("VEVENT");
}
