use std::sync::Arc;

use schoolcal_core::ScheduleSource;

use crate::cache_gate::CacheGate;

/// Shared application state
pub struct AppState<S> {
    gate: Arc<CacheGate<S>>,
}

impl<S: ScheduleSource> AppState<S> {
    pub fn new(gate: CacheGate<S>) -> Self {
        AppState {
            gate: Arc::new(gate),
        }
    }

    pub fn gate(&self) -> &CacheGate<S> {
        &self.gate
    }
}

// Manual impl: deriving would demand `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState {
            gate: Arc::clone(&self.gate),
        }
    }
}
