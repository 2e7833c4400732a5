use sitewatch_common::types::{AlertEvent, Severity};
use std::collections::HashMap;

/// Per-channel edge-triggered alert state.
///
/// Tracks the last-emitted severity per channel, in memory only; a process
/// restart starts from `none`. At most one event is emitted per distinct
/// state entry, so a channel stuck in breach cannot storm the event log.
#[derive(Debug, Default)]
pub struct AlertStateMachine {
    last: HashMap<String, Severity>,
}

impl AlertStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one evaluation verdict for a channel.
    ///
    /// Emits an event when the verdict differs from the channel's last
    /// emitted severity (rising edge, escalation or de-escalation between
    /// warn and critical). A `None` verdict resolves the channel silently:
    /// state clears, no event, and a later re-breach emits again.
    pub fn observe(
        &mut self,
        channel_id: &str,
        severity: Option<Severity>,
        latest_value: Option<f64>,
        now_ms: i64,
    ) -> Option<AlertEvent> {
        let last = self.last.get(channel_id).copied();
        match severity {
            Some(severity) if last != Some(severity) => {
                self.last.insert(channel_id.to_string(), severity);
                tracing::info!(
                    channel = channel_id,
                    severity = %severity,
                    previous = %last.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string()),
                    "alert state changed"
                );
                Some(AlertEvent {
                    event_id: AlertEvent::make_id(channel_id, now_ms),
                    channel_id: channel_id.to_string(),
                    value: latest_value.unwrap_or(0.0),
                    triggered_at_ms: now_ms,
                    severity,
                    acknowledged: false,
                })
            }
            Some(_) => None,
            None => {
                if self.last.remove(channel_id).is_some() {
                    tracing::debug!(channel = channel_id, "alert resolved");
                }
                None
            }
        }
    }

    /// Last emitted severity for a channel, if it is currently in alert.
    pub fn current(&self, channel_id: &str) -> Option<Severity> {
        self.last.get(channel_id).copied()
    }

    /// Channels currently in alert, with their severity.
    pub fn active(&self) -> impl Iterator<Item = (&str, Severity)> {
        self.last.iter().map(|(id, sev)| (id.as_str(), *sev))
    }

    /// Forget one channel's state (subscription cancelled).
    pub fn reset(&mut self, channel_id: &str) {
        self.last.remove(channel_id);
    }
}
