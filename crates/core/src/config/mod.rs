use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DrawRange, Result, WheelError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub draw: DrawConfig,
    pub audio: AudioConfig,
    pub timing: TimingConfig,
}

impl AppConfig {
    /// Loads a configuration from a JSON file. Missing fields fall back to
    /// their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.draw.range()?;
        self.audio.validate()
    }
}

/// Range and priority settings read by the draw engine on every start/stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub min: i64,
    pub max: i64,
    /// Numbers drawn before any random number, in this order.
    pub priority_list: Vec<i64>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            min: 1,
            max: 100,
            priority_list: Vec::new(),
        }
    }
}

impl DrawConfig {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            priority_list: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority_list: Vec<i64>) -> Self {
        self.priority_list = priority_list;
        self
    }

    /// Returns the validated inclusive range.
    pub fn range(&self) -> Result<DrawRange> {
        DrawRange::new(self.min, self.max)
    }

    /// Priority entries that can never be drawn because they fall outside
    /// the configured range.
    pub fn inert_priorities(&self) -> Vec<i64> {
        self.priority_list
            .iter()
            .copied()
            .filter(|n| *n < self.min || *n > self.max)
            .collect()
    }
}

/// Settings for the audio cues and the background music transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub volume: f32,
    /// Empty when no background track is configured.
    pub music_url: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            music_url: String::new(),
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> Result<()> {
        if (0.0..=1.0).contains(&self.volume) {
            Ok(())
        } else {
            Err(WheelError::InvalidVolume(self.volume))
        }
    }

    pub fn has_music(&self) -> bool {
        !self.music_url.trim().is_empty()
    }

    /// Whether tick and win cues should be emitted at all.
    pub fn is_audible(&self) -> bool {
        self.volume > 0.0
    }
}

/// Animation timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub tick_interval_ms: u64,
    pub celebration_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            celebration_ms: 5_000,
        }
    }
}

impl TimingConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn celebration(&self) -> Duration {
        Duration::from_millis(self.celebration_ms)
    }
}

/// Parses the comma separated priority text used by the settings editor.
/// Entries that are not integers are skipped.
pub fn parse_priority_list(text: &str) -> Vec<i64> {
    text.split(',')
        .filter_map(|entry| entry.trim().parse::<i64>().ok())
        .collect()
}
