//! Notifications published by the engine
//!
//! Events carry no payload. Channel subscribers re-read state through a
//! snapshot; synchronous observers get the object list as it stood right
//! after the event. Nothing is delivered until the frame has completed.

use std::sync::{Arc, Mutex};

use super::state::PhysicalObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// One colliding pair was resolved
    CollisionProcessed,
    /// A frame advance completed
    FrameUpdated,
}

/// Synchronous listener called at the end of a frame advance
///
/// `Sync` lets an engine with observers sit behind the runner's `RwLock`.
pub trait Observer: Send + Sync {
    fn notify(&mut self, event: SimEvent, objects: &[PhysicalObject]);
}

/// Lets callers keep a handle to an observer the engine also owns
impl<T: Observer> Observer for Arc<Mutex<T>> {
    fn notify(&mut self, event: SimEvent, objects: &[PhysicalObject]) {
        self.lock()
            .unwrap_or_else(|e| e.into_inner())
            .notify(event, objects);
    }
}
