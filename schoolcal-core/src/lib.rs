//! Core of schoolcal: turns NEIS school schedules into ICS calendars.
//!
//! - [`neis`] fetches and decodes schedules from the NEIS Open API
//! - [`ics`] renders them as an iCalendar document
//! - [`freshness`] decides whether a previously rendered document can be reused

pub mod config;
pub mod constants;
pub mod date;
pub mod error;
pub mod freshness;
pub mod ics;
pub mod neis;
pub mod schedule;

pub use config::SchoolCalConfig;
pub use error::{SchoolCalError, SchoolCalResult};
pub use freshness::{Freshness, is_fresh};
pub use ics::render_calendar;
pub use neis::{NeisClient, ScheduleSource};
pub use schedule::{ScheduleRecord, ScheduleResponse, SchoolKey};
