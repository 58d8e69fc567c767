//! Deterministic simulation module
//!
//! All physics lives here. This module must stay pure and deterministic:
//! - Time only enters through the frame budget
//! - Stable iteration order (by object index)
//! - No rendering or platform dependencies beyond the clock trait

pub mod collision;
pub mod event;
pub mod segment;
pub mod state;
pub mod tick;

pub use collision::{Collision, elastic_velocity, moving_towards, nearest_collision, wall_velocity};
pub use event::{Observer, SimEvent};
pub use segment::Segment;
pub use state::{Block, CollisionResponse, MaterialPoint, PhysicalObject, Wall};
pub use tick::{Engine, FrameReport};
