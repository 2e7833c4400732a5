//! Channel registry and payload normalization.
//!
//! Each physical sensor family reports its own raw JSON shape. The
//! normalizer converts those heterogeneous payloads into [`Reading`]s;
//! anything missing a required numeric field is dropped silently so a
//! glitching sensor never interrupts the rest of the stream.
//!
//! [`Reading`]: sitewatch_common::types::Reading

pub mod channels;
pub mod normalize;

#[cfg(test)]
mod tests;

pub use channels::{channel, channels_for_source, registry, ChannelKind, ChannelSpec};
pub use normalize::normalize;
