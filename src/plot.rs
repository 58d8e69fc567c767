//! Velocity-space trajectory
//!
//! With coordinates `x = v1 * sqrt(m1)` and `y = v2 * sqrt(m2)` the kinetic
//! energy of two blocks is `(x² + y²) / 2`, so every state of an elastic
//! system lies on one circle. Points are normalized by the radius of the
//! starting state and are recorded after each resolved collision.

use glam::DVec2;

use crate::error::{Result, SimError};
use crate::sim::{Block, Observer, PhysicalObject, SimEvent};

fn block_at(objects: &[PhysicalObject], index: usize) -> Result<&Block> {
    objects
        .get(index)
        .ok_or(SimError::UnknownObject(index))?
        .as_block()
        .ok_or(SimError::NotABlock(index))
}

/// Velocity-space point of two blocks; its length is `sqrt(2 * energy)`
pub fn velocity_point(a: &Block, b: &Block) -> DVec2 {
    DVec2::new(a.velocity() * a.mass().sqrt(), b.velocity() * b.mass().sqrt())
}

#[derive(Debug, Clone)]
pub struct VelocityPlot {
    first: usize,
    second: usize,
    /// Circle radius of the starting state
    radius: f64,
    points: Vec<DVec2>,
}

impl VelocityPlot {
    /// Track blocks `first` (x axis) and `second` (y axis), starting from their current state
    pub fn new(objects: &[PhysicalObject], first: usize, second: usize) -> Result<Self> {
        let start = velocity_point(block_at(objects, first)?, block_at(objects, second)?);
        let radius = start.length();
        let mut plot = Self {
            first,
            second,
            radius,
            points: Vec::new(),
        };
        plot.push(start);
        Ok(plot)
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Consecutive point pairs, one line per collision
    pub fn segments(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Points mapped into a square of half-width `radius` around `center`, y pointing down
    pub fn scaled(&self, center: DVec2, radius: f64) -> Vec<DVec2> {
        self.points
            .iter()
            .map(|p| center + DVec2::new(p.x, -p.y) * radius)
            .collect()
    }

    fn push(&mut self, point: DVec2) {
        // A system at rest has no circle to normalize by
        let point = if self.radius > 0.0 { point / self.radius } else { point };
        self.points.push(point);
    }

    fn record(&mut self, objects: &[PhysicalObject]) {
        match (block_at(objects, self.first), block_at(objects, self.second)) {
            (Ok(a), Ok(b)) => self.push(velocity_point(a, b)),
            _ => log::warn!("Velocity plot lost track of blocks {} and {}", self.first, self.second),
        }
    }
}

impl Observer for VelocityPlot {
    fn notify(&mut self, event: SimEvent, objects: &[PhysicalObject]) {
        if event == SimEvent::CollisionProcessed {
            self.record(objects);
        }
    }
}
