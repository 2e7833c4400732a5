use sitewatch_common::types::Reading;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct ChannelState {
    /// Merged, chronologically sorted, window-bounded series.
    series: Vec<Reading>,
    /// Readings received since the last tick, in arrival order.
    pending: Vec<Reading>,
    /// Wall-clock receipt time of the last ingest. Distinct from the latest
    /// reading's own timestamp; used for online/offline liveness checks.
    last_ingest_ms: Option<i64>,
}

/// Detached snapshot of one channel's visible state.
#[derive(Debug, Clone)]
pub struct ChannelView {
    pub series: Vec<Reading>,
    pub latest: Option<Reading>,
    pub last_ingest_ms: Option<i64>,
}

/// Per-channel pending buffers plus merged series.
///
/// `ingest` may be called at any time and never reorders anything; all
/// visible mutation happens inside `tick`. Channels are independent.
#[derive(Debug, Default)]
pub struct SeriesBuffer {
    channels: HashMap<String, ChannelState>,
}

impl SeriesBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register a channel so ticks age out its data even while the
    /// stream is silent.
    pub fn track(&mut self, channel_id: &str) {
        self.channels.entry(channel_id.to_string()).or_default();
    }

    /// Append a reading to the channel's pending buffer. Arrival order is
    /// preserved; nothing is sorted or pruned here.
    pub fn ingest(&mut self, channel_id: &str, reading: Reading, received_at_ms: i64) {
        let state = self.channels.entry(channel_id.to_string()).or_default();
        state.pending.push(reading);
        state.last_ingest_ms = Some(received_at_ms);
    }

    /// Merge every channel's pending buffer into its series, re-sort by
    /// ascending timestamp (stable, so equal timestamps keep arrival order)
    /// and drop entries older than `window_ms`.
    ///
    /// The prune step runs even when nothing arrived, so a silent stream
    /// still ages out of the window.
    pub fn tick(&mut self, now_ms: i64, window_ms: i64) {
        for state in self.channels.values_mut() {
            if !state.pending.is_empty() {
                state.series.append(&mut state.pending);
                state.series.sort_by_key(|r| r.timestamp_ms);
            }
            state.series.retain(|r| now_ms - r.timestamp_ms <= window_ms);
        }
    }

    /// Fresh copy of the channel's current series; shares no state with the
    /// internal buffers. Empty for unknown channels.
    pub fn series(&self, channel_id: &str) -> Vec<Reading> {
        self.channels
            .get(channel_id)
            .map(|s| s.series.clone())
            .unwrap_or_default()
    }

    /// Most recent reading in the merged series, if any.
    pub fn latest(&self, channel_id: &str) -> Option<Reading> {
        self.channels
            .get(channel_id)
            .and_then(|s| s.series.last().copied())
    }

    pub fn last_ingest_ms(&self, channel_id: &str) -> Option<i64> {
        self.channels.get(channel_id).and_then(|s| s.last_ingest_ms)
    }

    pub fn view(&self, channel_id: &str) -> ChannelView {
        let state = self.channels.get(channel_id);
        ChannelView {
            series: state.map(|s| s.series.clone()).unwrap_or_default(),
            latest: state.and_then(|s| s.series.last().copied()),
            last_ingest_ms: state.and_then(|s| s.last_ingest_ms),
        }
    }

    /// Discard a channel's buffers entirely (subscription cancelled).
    /// Returns true when the channel existed.
    pub fn remove(&mut self, channel_id: &str) -> bool {
        self.channels.remove(channel_id).is_some()
    }

    pub fn channel_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.channels.keys().cloned().collect();
        ids.sort();
        ids
    }
}
