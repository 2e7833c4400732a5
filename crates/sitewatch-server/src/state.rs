use crate::config::ServerConfig;
use chrono::{DateTime, Utc};
use sitewatch_alert::AlertStateMachine;
use sitewatch_series::SeriesBuffer;
use sitewatch_store::RuleStore;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    pub buffer: Arc<Mutex<SeriesBuffer>>,
    pub store: Arc<Mutex<RuleStore>>,
    pub alerts: Arc<Mutex<AlertStateMachine>>,
    pub start_time: DateTime<Utc>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Assemble state with every registered channel pre-tracked in the
    /// buffer, so ticks age out silent channels from the start.
    pub fn new(config: ServerConfig, store: RuleStore) -> Self {
        let mut buffer = SeriesBuffer::new();
        for spec in sitewatch_ingest::registry() {
            buffer.track(spec.id);
        }
        Self {
            buffer: Arc::new(Mutex::new(buffer)),
            store: Arc::new(Mutex::new(store)),
            alerts: Arc::new(Mutex::new(AlertStateMachine::new())),
            start_time: Utc::now(),
            config: Arc::new(config),
        }
    }
}
