//! Scenario descriptions
//!
//! A scenario is the ordered list of bodies an engine starts with. Order
//! matters: it is the identity of each object and the tie-break order for
//! simultaneous collisions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::{Block, PhysicalObject, Wall};

/// One body in a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectSpec {
    Block {
        size: f64,
        mass: f64,
        velocity: f64,
        position: f64,
    },
    Wall {
        position: f64,
    },
}

impl ObjectSpec {
    pub fn build(&self) -> Result<PhysicalObject> {
        Ok(match *self {
            ObjectSpec::Block {
                size,
                mass,
                velocity,
                position,
            } => Block::new(size, mass, velocity, position)?.into(),
            ObjectSpec::Wall { position } => Wall::new(position)?.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub objects: Vec<ObjectSpec>,
}

impl Scenario {
    /// The pi-counting setup: a light block between a wall and a heavy one
    ///
    /// The heavy block weighs `100^(digits - 1)` times the light one, so the
    /// total number of collisions spells the first `digits` digits of pi.
    pub fn classic(digits: u32) -> Self {
        let digits = digits.max(1);
        let mass_ratio = 100f64.powi(digits as i32 - 1);
        Self {
            name: format!("classic-{digits}"),
            objects: vec![
                ObjectSpec::Block {
                    size: 1.0,
                    mass: 1.0,
                    velocity: 0.0,
                    position: 2.0,
                },
                ObjectSpec::Block {
                    size: 1.5,
                    mass: mass_ratio,
                    velocity: -2.0,
                    position: 6.0,
                },
                ObjectSpec::Wall { position: 0.0 },
            ],
        }
    }

    /// Validate every entry and create the bodies in order
    pub fn build(&self) -> Result<Vec<PhysicalObject>> {
        self.objects.iter().map(ObjectSpec::build).collect()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let scenario = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Loaded scenario '{}' ({} objects) from {}",
            scenario.name,
            scenario.objects.len(),
            path.display()
        );
        Ok(scenario)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
