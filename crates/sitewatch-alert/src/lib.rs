//! Alert evaluation for windowed sensor series.
//!
//! [`evaluator::evaluate`] is a pure function from a series and a rule to a
//! severity verdict, with a hysteresis dead-band around the threshold to
//! prevent flapping. [`state::AlertStateMachine`] turns the stream of
//! verdicts into edge-triggered events: one event per distinct state entry,
//! silent resolution back to normal.

pub mod defaults;
pub mod evaluator;
pub mod state;


pub use evaluator::evaluate;
pub use state::AlertStateMachine;
