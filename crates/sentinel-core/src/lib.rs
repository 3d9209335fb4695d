//! Sentinel Core - serialized simulation engine for the sentinel robot
//!
//! Wraps the pure rules of `sentinel-logic` in the single execution
//! context they need: one owner of the factory state, a timer queue for
//! fuel decay and station replenishment, an inbound command queue, and a
//! dirty-flag driven render loop that pushes frames to an LED sink.
//!
//! # Architecture
//!
//! - **Engine**: owns the state aggregate, dispatches commands and timers
//! - **Scheduler**: one-shot and recurring tasks keyed by simulated time
//! - **Sinks**: traits for the LED matrix and the feedback channels
//! - **Indicator**: plays blink and tone patterns back against the clock
//!
//! # Example
//!
//! ```rust,no_run
//! use sentinel_core::prelude::*;
//!
//! let mut engine = SentinelEngine::headless(SimConfig::default()).unwrap();
//!
//! engine.submit("up");
//! loop {
//!     engine.poll(); // one 200ms step
//! }
//! ```

pub mod engine;
pub mod indicator;
pub mod scheduler;
pub mod sinks;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::SentinelEngine;
    pub use crate::indicator::IndicatorPanel;
    pub use crate::scheduler::{Scheduler, Task};
    pub use crate::sinks::{FeedbackLog, FeedbackSink, LedSink, MatrixBuffer};
    pub use sentinel_logic::commands::Command;
    pub use sentinel_logic::config::SimConfig;
}
