//! Per-channel time-windowed series buffering.
//!
//! Readings arrive asynchronously and possibly out of timestamp order.
//! [`SeriesBuffer::ingest`] only appends to a per-channel pending queue; the
//! periodic [`SeriesBuffer::tick`] is the single point that merges, sorts and
//! prunes, so readers only ever observe a fully-merged snapshot.

pub mod buffer;
pub mod range;


pub use buffer::{ChannelView, SeriesBuffer};
pub use range::TimeRange;
