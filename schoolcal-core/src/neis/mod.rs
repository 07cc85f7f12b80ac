//! NEIS Open API access.
//!
//! `client` performs the HTTP call (with timeout and retry) and `response`
//! decodes the JSON envelope into a [`ScheduleResponse`](crate::schedule::ScheduleResponse).

mod client;
mod response;
mod window;

pub use client::{NeisClient, ScheduleSource};
pub use response::decode_schedule;
pub use window::ScheduleWindow;
