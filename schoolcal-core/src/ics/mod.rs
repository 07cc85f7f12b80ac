//! ICS generation.
//!
//! Calendars are written line by line through [`IcsWriter`], which escapes
//! TEXT values and folds long lines according to RFC 5545.

mod created_time;
mod render;
mod writer;

pub use created_time::{extract_created_time, format_created_time, parse_created_time};
pub use render::render_calendar;
pub use writer::{IcsWriter, escape_text};
