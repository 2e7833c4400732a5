//! User-configured alert rules and the capped alert event log.
//!
//! The store owns both collections and is the only mutator of the
//! `acknowledged` flag. Every mutation re-serializes the full
//! `{rules, events}` shape to disk, so the persisted document always
//! matches memory.

pub mod error;
pub mod store;


pub use error::StoreError;
pub use store::{RuleStore, EVENT_LOG_CAP, STORE_FILE_NAME};
