//! Pi Collision - one-dimensional elastic block collisions
//!
//! A light block sits between a wall and a heavy block. Counting every
//! collision until the blocks drift apart yields the digits of pi.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, bodies, collision engine)
//! - `platform`: Clock and background update loop
//! - `capture`: Frame recording and replay
//! - `plot`: Velocity-space trajectory points
//! - `scenario`, `settings`: Data-driven setup and configuration

pub mod capture;
pub mod error;
pub mod platform;
pub mod plot;
pub mod scenario;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use scenario::Scenario;
pub use settings::{FramePolicy, Settings, TimeSource};
pub use sim::Engine;

/// Engine configuration constants
pub mod consts {
    /// Nominal interval between two frames (milliseconds)
    pub const DEFAULT_INTERVAL_MS: u64 = 10;
    /// Directions and velocities below this magnitude count as zero
    pub const DEFAULT_EPSILON: f64 = 1e-15;
    /// Upper bound on collisions resolved in one frame
    pub const DEFAULT_MAX_COLLISIONS_PER_FRAME: usize = 1_000_000;
}
