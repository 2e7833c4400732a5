use crate::state::AppState;
use sitewatch_alert::{defaults, evaluate};
use sitewatch_common::now_ms;
use sitewatch_common::types::Reading;
use tokio::time::{interval, Duration};

/// Periodic merge/sort/prune + alert evaluation cycle.
///
/// The tick is the single point that mutates visible series state; ingest
/// handlers only append to pending buffers. Runs on a fixed cadence
/// regardless of arrival bursts.
pub struct TickScheduler {
    state: AppState,
}

impl TickScheduler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn run(&self) {
        let tick_secs = self.state.config.tick_secs;
        tracing::info!(
            tick_secs,
            retention = %self.state.config.retention_range,
            "tick scheduler started"
        );
        let mut tick = interval(Duration::from_secs(tick_secs));
        loop {
            tick.tick().await;
            self.run_cycle();
        }
    }

    /// One full cycle: advance every channel's series, then evaluate alerts.
    pub fn run_cycle(&self) {
        let now = now_ms();
        let window_ms = match self.state.config.retention() {
            Ok(range) => range.as_millis(),
            Err(e) => {
                tracing::error!(error = %e, "invalid retention range, skipping cycle");
                return;
            }
        };

        // Merge/sort/prune all channels, then take detached snapshots so no
        // lock is held across evaluation.
        let snapshots: Vec<(String, Vec<Reading>)> = {
            let mut buffer = self
                .state
                .buffer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            buffer.tick(now, window_ms);
            buffer
                .channel_ids()
                .into_iter()
                .map(|id| {
                    let series = buffer.series(&id);
                    (id, series)
                })
                .collect()
        };

        for (channel_id, series) in snapshots {
            let rule = {
                let store = self
                    .state
                    .store
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                let (rule, _) = defaults::resolve(&channel_id, store.rule(&channel_id));
                rule
            };
            // Disabled rules make no transitions and emit nothing.
            if !rule.enabled {
                continue;
            }

            let severity = evaluate(&series, &rule, now);
            let latest_value = series.last().map(|r| r.value);

            let event = {
                let mut alerts = self
                    .state
                    .alerts
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                alerts.observe(&channel_id, severity, latest_value, now)
            };

            if let Some(event) = event {
                tracing::info!(
                    channel = %event.channel_id,
                    severity = %event.severity,
                    value = event.value,
                    "alert event recorded"
                );
                let mut store = self
                    .state
                    .store
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                if let Err(e) = store.add_event(event) {
                    tracing::error!(error = %e, "failed to persist alert event");
                }
            }
        }
    }
}
