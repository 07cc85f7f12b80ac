//! HTTP front end for schoolcal: serves NEIS school schedules as ICS feeds.

pub mod cache_gate;
pub mod routes;
pub mod state;

use axum::Router;
use schoolcal_core::ScheduleSource;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use cache_gate::{CacheGate, CacheStatus, CachedCalendar};
pub use state::AppState;

/// Build the application router.
pub fn app<S: ScheduleSource + 'static>(state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::school::router::<S>())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use schoolcal_core::date::parse_compact_date;
    use schoolcal_core::{
        ScheduleRecord, ScheduleResponse, ScheduleSource, SchoolCalError, SchoolCalResult,
    };

    /// In-memory schedule source that counts its calls.
    pub struct FakeSource {
        calls: AtomicUsize,
        records: Vec<ScheduleRecord>,
        fail: Option<fn() -> SchoolCalError>,
        delay: Duration,
    }

    impl FakeSource {
        pub fn with_records(records: Vec<ScheduleRecord>) -> Self {
            FakeSource {
                calls: AtomicUsize::new(0),
                records,
                fail: None,
                delay: Duration::ZERO,
            }
        }

        pub fn failing(make_error: fn() -> SchoolCalError) -> Self {
            FakeSource {
                fail: Some(make_error),
                ..Self::with_records(vec![])
            }
        }

        pub fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ScheduleSource for FakeSource {
        fn fetch(
            &self,
            _office_code: &str,
            _school_code: &str,
        ) -> impl Future<Output = SchoolCalResult<ScheduleResponse>> + Send {
            async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                match self.fail {
                    Some(make_error) => Err(make_error()),
                    None => Ok(ScheduleResponse::new(self.records.clone())),
                }
            }
        }
    }

    pub fn record(date: &str, name: &str, school: &str) -> ScheduleRecord {
        ScheduleRecord {
            event_date: parse_compact_date(date).unwrap(),
            event_name: name.to_string(),
            event_content: String::new(),
            school_name: school.to_string(),
        }
    }
}
