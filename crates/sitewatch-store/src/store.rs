use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use sitewatch_common::types::{AlertEvent, AlertRule};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Maximum retained alert events; the oldest are evicted on overflow.
pub const EVENT_LOG_CAP: usize = 100;

/// File name of the persisted store document under the data directory.
pub const STORE_FILE_NAME: &str = "alerts-store.json";

/// The persisted shape: the whole store round-trips as one document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    rules: HashMap<String, AlertRule>,
    #[serde(default)]
    events: Vec<AlertEvent>,
}

/// Rules keyed by channel (at most one each) plus the most-recent-first
/// event log. Every mutation rewrites the backing document.
#[derive(Debug)]
pub struct RuleStore {
    doc: StoreDocument,
    path: Option<PathBuf>,
}

impl RuleStore {
    /// Open (or initialize) the store backed by `data_dir/alerts-store.json`.
    ///
    /// A missing file starts empty; an unreadable one is logged and
    /// replaced on the next mutation rather than failing startup.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORE_FILE_NAME);
        let doc = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<StoreDocument>(&bytes) {
                Ok(mut doc) => {
                    doc.events.truncate(EVENT_LOG_CAP);
                    doc
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "corrupt store document, starting empty");
                    StoreDocument::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreDocument::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            doc,
            path: Some(path),
        })
    }

    /// Ephemeral store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            doc: StoreDocument::default(),
            path: None,
        }
    }

    pub fn rules(&self) -> &HashMap<String, AlertRule> {
        &self.doc.rules
    }

    pub fn rule(&self, channel_id: &str) -> Option<&AlertRule> {
        self.doc.rules.get(channel_id)
    }

    /// Insert or replace the rule for its channel.
    pub fn set_rule(&mut self, rule: AlertRule) -> Result<(), StoreError> {
        self.doc.rules.insert(rule.channel_id.clone(), rule);
        self.persist()
    }

    /// Delete a channel's rule. Returns whether one existed.
    pub fn remove_rule(&mut self, channel_id: &str) -> Result<bool, StoreError> {
        let removed = self.doc.rules.remove(channel_id).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn events(&self) -> &[AlertEvent] {
        &self.doc.events
    }

    pub fn unacknowledged(&self) -> usize {
        self.doc.events.iter().filter(|e| !e.acknowledged).count()
    }

    /// Prepend an event and evict past the cap.
    pub fn add_event(&mut self, event: AlertEvent) -> Result<(), StoreError> {
        self.doc.events.insert(0, event);
        self.doc.events.truncate(EVENT_LOG_CAP);
        self.persist()
    }

    /// Flip `acknowledged` on the matching event. Returns false (a no-op,
    /// nothing persisted) when the id is unknown.
    pub fn ack_event(&mut self, event_id: &str) -> Result<bool, StoreError> {
        match self
            .doc
            .events
            .iter_mut()
            .find(|e| e.event_id == event_id)
        {
            Some(event) => {
                event.acknowledged = true;
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(&self.doc)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
