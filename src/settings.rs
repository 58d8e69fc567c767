//! Engine settings
//!
//! Persisted as JSON next to scenarios. Missing fields fall back to defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_EPSILON, DEFAULT_INTERVAL_MS, DEFAULT_MAX_COLLISIONS_PER_FRAME};
use crate::error::Result;

/// How the rest of a frame is spent after a collision is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FramePolicy {
    /// Re-scan with the full frame budget; colliding blocks stop at the contact point
    #[default]
    Rescan,
    /// Consume time up to each contact; every block coasts for what is left
    Sweep,
}

impl FramePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FramePolicy::Rescan => "rescan",
            FramePolicy::Sweep => "sweep",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rescan" => Some(FramePolicy::Rescan),
            "sweep" | "exact" => Some(FramePolicy::Sweep),
            _ => None,
        }
    }
}

/// Where the frame budget comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeSource {
    /// Real time elapsed since the previous frame
    #[default]
    Clock,
    /// The nominal interval, every frame
    Fixed,
}

impl TimeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSource::Clock => "clock",
            TimeSource::Fixed => "fixed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "clock" | "realtime" => Some(TimeSource::Clock),
            "fixed" | "tick" => Some(TimeSource::Fixed),
            _ => None,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Nominal interval between two frames (milliseconds)
    pub interval_ms: u64,
    /// Magnitudes at or below this count as zero when comparing directions
    pub epsilon: f64,
    pub policy: FramePolicy,
    pub time_source: TimeSource,
    /// A frame resolving more collisions than this is aborted
    pub max_collisions_per_frame: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            epsilon: DEFAULT_EPSILON,
            policy: FramePolicy::Rescan,
            time_source: TimeSource::Clock,
            max_collisions_per_frame: DEFAULT_MAX_COLLISIONS_PER_FRAME,
        }
    }
}

impl Settings {
    /// Deterministic settings: fixed tick, default everything else
    pub fn fixed_tick() -> Self {
        Self {
            time_source: TimeSource::Fixed,
            ..Self::default()
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Nominal frame budget in seconds
    pub fn tick_seconds(&self) -> f64 {
        self.interval().as_secs_f64()
    }

    pub fn with_policy(mut self, policy: FramePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(err) => log::warn!("Ignoring settings in {}: {}", path.display(), err),
            },
            Err(err) => log::warn!("Cannot read settings {}: {}", path.display(), err),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
