//! Platform abstraction layer
//!
//! Handles what the simulation kernel needs from its host:
//! - Time (system or manually driven clock)
//! - The periodic update loop running on its own thread

pub mod clock;
pub mod runner;

pub use clock::{Clock, ManualClock, SystemClock};
pub use runner::Runner;
