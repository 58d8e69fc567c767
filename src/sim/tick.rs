//! Frame advancement
//!
//! One frame covers a time budget. Inside it the engine repeatedly finds the
//! nearest collision, resolves that single pair, and scans again until no
//! contact falls inside the budget. Blocks are then advanced by free flight.

use std::sync::mpsc::{self, Receiver, Sender};

use super::collision::{self, Collision};
use super::event::{Observer, SimEvent};
use super::state::PhysicalObject;
use crate::error::{Result, SimError};
use crate::platform::{Clock, SystemClock};
use crate::scenario::Scenario;
use crate::settings::{FramePolicy, Settings, TimeSource};

/// What a single frame advance did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Budget the frame covered (seconds)
    pub time_delta: f64,
    /// Collisions resolved during the frame
    pub collisions: usize,
}

/// The collision engine
///
/// Owns every tracked body. Object indices are fixed for the engine's
/// lifetime and identify participants.
pub struct Engine {
    objects: Vec<PhysicalObject>,
    settings: Settings,
    clock: Box<dyn Clock>,
    /// Clock reading at the end of the previous frame
    time_offset: f64,
    total_collisions: u64,
    frames: u64,
    subscribers: Vec<Sender<SimEvent>>,
    observers: Vec<Box<dyn Observer>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("objects", &self.objects)
            .field("settings", &self.settings)
            .field("total_collisions", &self.total_collisions)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(objects: Vec<PhysicalObject>, settings: Settings) -> Self {
        Self::with_clock(objects, settings, SystemClock::new())
    }

    pub fn with_clock(objects: Vec<PhysicalObject>, settings: Settings, clock: impl Clock + 'static) -> Self {
        let clock: Box<dyn Clock> = Box::new(clock);
        let time_offset = clock.now();
        Self {
            objects,
            settings,
            clock,
            time_offset,
            total_collisions: 0,
            frames: 0,
            subscribers: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn from_scenario(scenario: &Scenario, settings: Settings) -> Result<Self> {
        let objects = scenario.build()?;
        log::info!(
            "Engine created for '{}': {} objects, policy {}",
            scenario.name,
            objects.len(),
            settings.policy.as_str()
        );
        Ok(Self::new(objects, settings))
    }

    /// Tracked bodies in their fixed order
    pub fn objects(&self) -> &[PhysicalObject] {
        &self.objects
    }

    /// Owned copy of every tracked body
    pub fn snapshot(&self) -> Vec<PhysicalObject> {
        self.objects.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Collision events resolved since creation
    pub fn total_collisions(&self) -> u64 {
        self.total_collisions
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Receive a notification per resolved pair and per completed frame
    pub fn subscribe(&mut self) -> Receiver<SimEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Register a listener called synchronously during frame advance
    pub fn observe(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Re-anchor elapsed-time measurement to now
    pub fn reset_time(&mut self) {
        self.time_offset = self.clock.now();
    }

    /// True when no pair will ever meet again
    pub fn is_settled(&self) -> bool {
        collision::is_settled(&self.objects, self.settings.epsilon)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.objects
            .iter()
            .filter_map(PhysicalObject::as_block)
            .map(|b| b.properties().kinetic_energy())
            .sum()
    }

    pub fn momentum(&self) -> f64 {
        self.objects
            .iter()
            .filter_map(PhysicalObject::as_block)
            .map(|b| b.properties().impulse())
            .sum()
    }

    /// Change a block's mass and velocity between frames
    pub fn edit_block(&mut self, index: usize, mass: f64, velocity: f64) -> Result<()> {
        let object = self
            .objects
            .get_mut(index)
            .ok_or(SimError::UnknownObject(index))?;
        let block = object.as_block_mut().ok_or(SimError::NotABlock(index))?;
        block.set_properties(mass, velocity)?;
        log::info!("Block {index} edited: mass={mass}, velocity={velocity}");
        Ok(())
    }

    /// Advance by the time elapsed since the last frame (or the fixed tick)
    pub fn update(&mut self) -> Result<FrameReport> {
        let time_delta = match self.settings.time_source {
            TimeSource::Clock => self.clock.now() - self.time_offset,
            TimeSource::Fixed => self.settings.tick_seconds(),
        };
        let report = self.advance(time_delta)?;
        self.reset_time();
        Ok(report)
    }

    /// Advance the simulation by exactly `time_delta` seconds
    ///
    /// A failed frame leaves the objects and counters as they were and
    /// publishes nothing.
    pub fn advance(&mut self, time_delta: f64) -> Result<FrameReport> {
        if !(time_delta.is_finite() && time_delta >= 0.0) {
            return Err(SimError::InvalidTimeDelta(time_delta));
        }

        let before = self.objects.clone();
        let mut staged = Vec::new();
        let outcome = match self.settings.policy {
            FramePolicy::Rescan => self.advance_rescan(time_delta, &mut staged),
            FramePolicy::Sweep => self.advance_sweep(time_delta, &mut staged),
        };
        let collisions = match outcome {
            Ok(collisions) => collisions,
            Err(err) => {
                self.objects = before;
                return Err(err);
            }
        };

        self.total_collisions += collisions as u64;
        self.frames += 1;
        for observer in &mut self.observers {
            for objects in &staged {
                observer.notify(SimEvent::CollisionProcessed, objects);
            }
            observer.notify(SimEvent::FrameUpdated, &self.objects);
        }
        self.send(SimEvent::CollisionProcessed, collisions);
        self.send(SimEvent::FrameUpdated, 1);

        Ok(FrameReport {
            time_delta,
            collisions,
        })
    }

    /// Every scan uses the whole budget; colliding blocks stay at their contact point
    fn advance_rescan(&mut self, budget: f64, staged: &mut Vec<Vec<PhysicalObject>>) -> Result<usize> {
        let mut processed = vec![false; self.objects.len()];
        let mut resolved = 0;

        while let Some(collision) = collision::nearest_collision(&self.objects, budget, self.settings.epsilon) {
            self.check_limit(resolved)?;
            self.resolve(collision, resolved);
            self.stage(staged);
            processed[collision.first] = true;
            processed[collision.second] = true;
            resolved += 1;
        }

        for (object, processed) in self.objects.iter_mut().zip(&processed) {
            if let (false, Some(block)) = (*processed, object.as_block_mut()) {
                block.advance(budget);
            }
        }
        Ok(resolved)
    }

    /// Time is consumed up to each contact; everything coasts for the rest
    fn advance_sweep(&mut self, budget: f64, staged: &mut Vec<Vec<PhysicalObject>>) -> Result<usize> {
        let mut remaining = budget;
        let mut resolved = 0;

        while let Some(collision) = collision::nearest_collision(&self.objects, remaining, self.settings.epsilon) {
            self.check_limit(resolved)?;
            self.coast(collision.time);
            remaining -= collision.time;
            self.resolve(
                Collision {
                    time: 0.0,
                    ..collision
                },
                resolved,
            );
            self.stage(staged);
            resolved += 1;
        }

        self.coast(remaining);
        Ok(resolved)
    }

    fn check_limit(&self, resolved: usize) -> Result<()> {
        let limit = self.settings.max_collisions_per_frame;
        if resolved >= limit {
            log::error!("Frame aborted after {resolved} collisions");
            return Err(SimError::CollisionLimit { limit });
        }
        Ok(())
    }

    /// Keep the post-collision state for observers until the frame commits
    fn stage(&self, staged: &mut Vec<Vec<PhysicalObject>>) {
        if !self.observers.is_empty() {
            staged.push(self.objects.clone());
        }
    }

    fn coast(&mut self, dt: f64) {
        for block in self.objects.iter_mut().filter_map(PhysicalObject::as_block_mut) {
            block.advance(dt);
        }
    }

    /// Apply one collision to both participants
    fn resolve(&mut self, collision: Collision, index_in_frame: usize) {
        let Collision { first, second, time } = collision;

        // Both responses come from the same pre-collision state
        let first_response = self.objects[first].collision_response(&self.objects[second], time);
        let second_response = self.objects[second].collision_response(&self.objects[first], time);

        for (index, response) in [(first, first_response), (second, second_response)] {
            if let (Some(response), Some(block)) = (response, self.objects[index].as_block_mut()) {
                block.apply(response);
            }
        }

        log::debug!(
            "collision #{}: {} <-> {} at +{:.6e}s, v = ({:.6}, {:.6})",
            self.total_collisions + index_in_frame as u64 + 1,
            first,
            second,
            time,
            self.objects[first].velocity(),
            self.objects[second].velocity()
        );
    }

    /// Send `count` copies of `event` to every channel, dropping closed ones
    fn send(&mut self, event: SimEvent, count: usize) {
        self.subscribers
            .retain(|tx| (0..count).all(|_| tx.send(event).is_ok()));
    }
}
