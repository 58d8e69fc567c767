//! Time sources for frame advancement

use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Monotonic time in seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall-clock time since the clock was created
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle while the engine
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f64) {
        let mut time = self.time.lock().unwrap_or_else(|e| e.into_inner());
        *time += seconds;
    }

    pub fn set(&self, seconds: f64) {
        *self.time.lock().unwrap_or_else(|e| e.into_inner()) = seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.time.lock().unwrap_or_else(|e| e.into_inner())
    }
}
