//! Error types for the collision simulator

use thiserror::Error;

/// Errors raised while building, advancing or persisting a simulation
#[derive(Debug, Error)]
pub enum SimError {
    /// Block mass must be positive and finite
    #[error("invalid mass: {0} (must be positive and finite)")]
    InvalidMass(f64),

    /// Block size must be non-negative and finite
    #[error("invalid size: {0} (must be non-negative and finite)")]
    InvalidSize(f64),

    /// A kinematic quantity was NaN or infinite
    #[error("non-finite {field}: {value}")]
    NonFinite {
        /// Which quantity was rejected
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Frame budget was negative or not finite
    #[error("invalid time delta: {0}")]
    InvalidTimeDelta(f64),

    /// No object exists at this index
    #[error("no object at index {0}")]
    UnknownObject(usize),

    /// The object at this index is a wall
    #[error("object {0} is not a block")]
    NotABlock(usize),

    /// A single frame resolved more collisions than allowed
    #[error("collision limit of {limit} reached in a single frame")]
    CollisionLimit {
        /// Configured per-frame limit
        limit: usize,
    },

    /// Another frame advance is already in flight
    #[error("engine is busy with another frame")]
    Busy,

    /// Replay requested on a capture without frames
    #[error("capture contains no frames")]
    EmptyCapture,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Creates a non-finite value error.
    #[must_use]
    pub const fn non_finite(field: &'static str, value: f64) -> Self {
        Self::NonFinite { field, value }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, SimError>;
