//! Simulation bodies
//!
//! All state the engine mutates lives here: blocks carry a material point and a
//! collision counter, walls are immovable boundaries.

use serde::{Deserialize, Serialize};

use super::collision;
use super::segment::Segment;
use crate::error::{Result, SimError};

/// Mass, velocity and position of a point body on the axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialPoint {
    mass: f64,
    pub velocity: f64,
    pub position: f64,
}

impl MaterialPoint {
    pub fn new(mass: f64, velocity: f64, position: f64) -> Result<Self> {
        validate_mass(mass)?;
        validate_finite("velocity", velocity)?;
        validate_finite("position", position)?;
        Ok(Self {
            mass,
            velocity,
            position,
        })
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Momentum (mass * velocity)
    #[inline]
    pub fn impulse(&self) -> f64 {
        self.mass * self.velocity
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        self.mass * self.velocity * self.velocity / 2.0
    }
}

fn validate_mass(mass: f64) -> Result<()> {
    if mass.is_finite() && mass > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidMass(mass))
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::non_finite(field, value))
    }
}

/// A movable rigid segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    size: f64,
    point: MaterialPoint,
    /// Number of collision events this block took part in
    #[serde(default)]
    collisions: u64,
}

impl Block {
    pub fn new(size: f64, mass: f64, velocity: f64, position: f64) -> Result<Self> {
        if !(size.is_finite() && size >= 0.0) {
            return Err(SimError::InvalidSize(size));
        }
        Ok(Self {
            size,
            point: MaterialPoint::new(mass, velocity, position)?,
            collisions: 0,
        })
    }

    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.point.mass
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.point.velocity
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.point.position
    }

    /// Read-only view of the material point
    #[inline]
    pub fn properties(&self) -> &MaterialPoint {
        &self.point
    }

    #[inline]
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// Position after coasting for `dt` at the current velocity
    #[inline]
    pub fn position_at(&self, dt: f64) -> f64 {
        self.point.position + self.point.velocity * dt
    }

    /// Occupied segment after coasting for `dt`
    pub fn segment_at(&self, dt: f64) -> Segment {
        Segment::from_extent(self.position_at(dt), self.size)
    }

    /// Coast for `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        self.point.position = self.position_at(dt);
    }

    /// Apply a collision response and count the event
    pub fn apply(&mut self, response: CollisionResponse) {
        self.point.position = response.position;
        self.point.velocity = response.velocity;
        self.register_collision();
    }

    pub fn register_collision(&mut self) {
        self.collisions += 1;
    }

    /// Replace mass and velocity, keeping position and counter
    pub fn set_properties(&mut self, mass: f64, velocity: f64) -> Result<()> {
        self.point = MaterialPoint::new(mass, velocity, self.point.position)?;
        Ok(())
    }
}

/// An immovable boundary point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    position: f64,
}

impl Wall {
    pub fn new(position: f64) -> Result<Self> {
        validate_finite("position", position)?;
        Ok(Self { position })
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }
}

/// Position and velocity an object takes on at its collision instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResponse {
    pub position: f64,
    pub velocity: f64,
}

/// Any body the engine tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicalObject {
    Block(Block),
    Wall(Wall),
}

impl PhysicalObject {
    pub fn velocity(&self) -> f64 {
        match self {
            PhysicalObject::Block(block) => block.velocity(),
            PhysicalObject::Wall(_) => 0.0,
        }
    }

    pub fn position(&self) -> f64 {
        match self {
            PhysicalObject::Block(block) => block.position(),
            PhysicalObject::Wall(wall) => wall.position(),
        }
    }

    /// Free-flight position after `dt`; walls never move
    pub fn position_at(&self, dt: f64) -> f64 {
        match self {
            PhysicalObject::Block(block) => block.position_at(dt),
            PhysicalObject::Wall(wall) => wall.position(),
        }
    }

    /// Signed gap between the two objects, both extrapolated by `dt` if given
    pub fn distance(&self, other: &PhysicalObject, dt: Option<f64>) -> f64 {
        let dt = dt.unwrap_or(0.0);
        match (self, other) {
            (PhysicalObject::Block(a), PhysicalObject::Block(b)) => {
                a.segment_at(dt).distance_to(&b.segment_at(dt))
            }
            (PhysicalObject::Block(block), PhysicalObject::Wall(wall))
            | (PhysicalObject::Wall(wall), PhysicalObject::Block(block)) => {
                block.segment_at(dt).distance_to_point(wall.position())
            }
            // Two boundaries never meet; the value only has to be defined
            (PhysicalObject::Wall(a), PhysicalObject::Wall(b)) => -b.position() - a.position(),
        }
    }

    /// Velocity after an elastic collision with `other`, `None` for walls
    pub fn collision_velocity(&self, other: &PhysicalObject) -> Option<f64> {
        let PhysicalObject::Block(block) = self else {
            return None;
        };
        Some(match other {
            PhysicalObject::Block(other) => collision::elastic_velocity(
                block.mass(),
                block.velocity(),
                other.mass(),
                other.velocity(),
            ),
            PhysicalObject::Wall(_) => collision::wall_velocity(block.velocity()),
        })
    }

    /// Position and velocity at a collision `time` from now, `None` for walls
    pub fn collision_response(&self, other: &PhysicalObject, time: f64) -> Option<CollisionResponse> {
        self.collision_velocity(other).map(|velocity| CollisionResponse {
            position: self.position_at(time),
            velocity,
        })
    }

    /// Segment (blocks) or degenerate segment (walls) currently occupied
    pub fn segment(&self) -> Segment {
        match self {
            PhysicalObject::Block(block) => block.segment_at(0.0),
            PhysicalObject::Wall(wall) => Segment::from_extent(wall.position(), 0.0),
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            PhysicalObject::Block(block) => Some(block),
            PhysicalObject::Wall(_) => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            PhysicalObject::Block(block) => Some(block),
            PhysicalObject::Wall(_) => None,
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, PhysicalObject::Wall(_))
    }
}

impl From<Block> for PhysicalObject {
    fn from(block: Block) -> Self {
        PhysicalObject::Block(block)
    }
}

impl From<Wall> for PhysicalObject {
    fn from(wall: Wall) -> Self {
        PhysicalObject::Wall(wall)
    }
}
