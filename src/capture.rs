//! Frame capture and replay
//!
//! A capture is an ordered list of frames, each frame the ordered list of
//! object snapshots at the end of a frame advance. The JSON layout uses
//! PascalCase keys:
//!
//! ```json
//! { "Frames": [ [ { "Position": 2.0, "Size": 1.0 }, { "Position": 0.0 } ] ] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::sim::{Observer, PhysicalObject, SimEvent};

/// What a renderer needs to draw one object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectSnapshot {
    pub position: f64,
    /// Present for blocks, absent for walls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl From<&PhysicalObject> for ObjectSnapshot {
    fn from(object: &PhysicalObject) -> Self {
        Self {
            position: object.position(),
            size: object.as_block().map(|b| b.size()),
        }
    }
}

pub type Frame = Vec<ObjectSnapshot>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Capture {
    pub frames: Vec<Frame>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the current state of `objects` as a new frame
    pub fn record(&mut self, objects: &[PhysicalObject]) {
        self.frames.push(objects.iter().map(ObjectSnapshot::from).collect());
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let capture = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded capture with {} frames from {}", capture.len(), path.display());
        Ok(capture)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Capture saved ({} frames) to {}", self.len(), path.display());
        Ok(())
    }
}

/// Records one frame per completed frame advance
#[derive(Debug, Default)]
pub struct CaptureRecorder {
    capture: Capture,
    /// Stop recording after this many frames
    limit: Option<usize>,
}

impl CaptureRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            capture: Capture::new(),
            limit: Some(limit),
        }
    }

    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    pub fn into_capture(self) -> Capture {
        self.capture
    }
}

impl Observer for CaptureRecorder {
    fn notify(&mut self, event: SimEvent, objects: &[PhysicalObject]) {
        if event != SimEvent::FrameUpdated {
            return;
        }
        if self.limit.is_some_and(|limit| self.capture.len() >= limit) {
            return;
        }
        self.capture.record(objects);
    }
}

/// Steps through a capture frame by frame
#[derive(Debug, Clone)]
pub struct Replay {
    capture: Capture,
    cursor: usize,
}

impl Replay {
    pub fn new(capture: Capture) -> Result<Self> {
        if capture.is_empty() {
            return Err(SimError::EmptyCapture);
        }
        Ok(Self { capture, cursor: 0 })
    }

    /// Next frame, or `None` once every frame was shown
    pub fn next_frame(&mut self) -> Option<&[ObjectSnapshot]> {
        let frame = self.capture.frames.get(self.cursor)?;
        self.cursor += 1;
        Some(frame)
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.capture.len()
    }
}
