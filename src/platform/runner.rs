//! Periodic update loop
//!
//! The engine lives behind one `RwLock`. The loop thread holds the write guard
//! for a whole frame; observers take a read guard just long enough to copy
//! what they need.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{Result, SimError};
use crate::sim::{Engine, FrameReport, PhysicalObject};

fn write(engine: &RwLock<Engine>) -> RwLockWriteGuard<'_, Engine> {
    engine.write().unwrap_or_else(|e| e.into_inner())
}

fn read(engine: &RwLock<Engine>) -> RwLockReadGuard<'_, Engine> {
    engine.read().unwrap_or_else(|e| e.into_inner())
}

/// Drives an engine from a background thread
pub struct Runner {
    engine: Arc<RwLock<Engine>>,
    running: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Runner {
    /// Start advancing `engine` every settings interval
    pub fn spawn(engine: Engine) -> Result<Self> {
        Self::spawn_on(engine, thread::Builder::new().name("pi-collision-sim".into()))
    }

    fn spawn_on(engine: Engine, builder: thread::Builder) -> Result<Self> {
        let interval = engine.settings().interval();
        let engine = Arc::new(RwLock::new(engine));
        let running = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = {
            let engine = Arc::clone(&engine);
            let running = Arc::clone(&running);
            let shutdown = Arc::clone(&shutdown);
            builder.spawn(move || run_loop(&engine, &running, &shutdown, interval))
        }
        .inspect_err(|err| log::error!("Cannot spawn simulation thread: {err}"))?;

        let runner = Self {
            engine,
            running,
            shutdown,
            handle: Some(handle),
        };
        runner.start();
        Ok(runner)
    }

    /// Resume frame advancement without catching up on paused time
    pub fn start(&self) {
        write(&self.engine).reset_time();
        self.running.store(true, Ordering::SeqCst);
        log::info!("Simulation started");
        self.wake();
    }

    /// Pause between frames
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        log::info!("Simulation stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Copy of the tracked objects, taken under a short read guard
    pub fn snapshot(&self) -> Vec<PhysicalObject> {
        read(&self.engine).snapshot()
    }

    /// Read engine state while holding the guard
    pub fn with_engine<R>(&self, f: impl FnOnce(&Engine) -> R) -> R {
        f(&read(&self.engine))
    }

    /// Modify the engine between frames
    pub fn with_engine_mut<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        f(&mut write(&self.engine))
    }

    /// Advance one frame now, failing if another frame is in flight
    pub fn try_advance(&self) -> Result<FrameReport> {
        let mut engine = match self.engine.try_write() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(SimError::Busy),
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
        };
        engine.update()
    }

    fn wake(&self) {
        if let Some(handle) = &self.handle {
            handle.thread().unpark();
        }
    }

    /// Stop the loop thread and wait for it to exit
    pub fn shutdown(mut self) {
        self.join();
    }

    fn join(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.wake();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Simulation thread panicked");
            }
        }
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        self.join();
    }
}

fn run_loop(engine: &RwLock<Engine>, running: &AtomicBool, shutdown: &AtomicBool, interval: Duration) {
    while !shutdown.load(Ordering::SeqCst) {
        if running.load(Ordering::SeqCst) {
            let result = write(engine).update();
            if let Err(err) = result {
                log::error!("Frame failed, stopping simulation: {err}");
                running.store(false, Ordering::SeqCst);
            }
        }
        thread::park_timeout(interval);
    }
    log::debug!("Simulation thread exiting");
}
