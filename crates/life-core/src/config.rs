//! Configuration types for the simulator.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Character marking a live cell in a textual pattern
pub const ALIVE_MARKER: char = 'x';

/// Glyph rendered for a live cell
pub const LIVE_GLYPH: char = '■';

/// Glyph rendered for a dead cell
pub const DEAD_GLYPH: char = ' ';

/// Demo starting pattern: a glider heading south-east.
pub const DEMO_PATTERN: &str = ".....\n..x..\n...x.\n.xxx.\n.....";

/// Frames cycled by the busy indicator
pub const SPINNER_FRAMES: [&str; 4] = ["-", "/", "|", "\\"];

/// Per-run pacing and output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Pause between turns (milliseconds)
    pub delay_ms: u64,
    /// Number of turns to run; zero or negative runs forever
    pub max_turns: i64,
    /// Clear the display before each rendering
    pub clear_screen: bool,
    /// Wait for an advance signal instead of sleeping
    pub interactive: bool,
    /// Animate a spinner while paused
    pub spinner: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            delay_ms: 500,
            max_turns: 0,
            clear_screen: false,
            interactive: false,
            spinner: false,
        }
    }
}

impl RunSettings {
    /// Load settings from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// The turn limit, or `None` for an unbounded run
    pub fn turn_limit(&self) -> Option<u64> {
        u64::try_from(self.max_turns).ok().filter(|&turns| turns > 0)
    }
}

/// Busy indicator animation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinnerConfig {
    pub frames: Vec<String>,
    /// Time each frame stays on screen (milliseconds)
    pub interval_ms: u64,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            frames: SPINNER_FRAMES.iter().map(|frame| frame.to_string()).collect(),
            interval_ms: 50,
        }
    }
}

impl SpinnerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Everything a config file may set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    pub run: RunSettings,
    pub spinner: SpinnerConfig,
}

impl LifeConfig {
    /// Load from JSON; absent sections and fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Layout of a textual pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternFormat {
    /// Separator between rows
    pub row_delimiter: char,
}

impl Default for PatternFormat {
    fn default() -> Self {
        Self { row_delimiter: '\n' }
    }
}

impl PatternFormat {
    pub fn with_delimiter(row_delimiter: char) -> Self {
        Self { row_delimiter }
    }
}

/// Parameters for sampling a random starting grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomGridConfig {
    pub width: u32,
    pub height: u32,
    /// Chance of each cell being alive, in (0, 1]
    pub probability: f64,
    /// Seed for reproducible grids
    pub seed: Option<u64>,
}

impl Default for RandomGridConfig {
    fn default() -> Self {
        Self {
            width: 9,
            height: 9,
            probability: 0.5,
            seed: None,
        }
    }
}

impl RandomGridConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Validation(format!(
                "grid size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.probability > 0.0 && self.probability <= 1.0) {
            return Err(Error::Validation(format!(
                "probability must be in (0, 1], got {}",
                self.probability
            )));
        }
        Ok(())
    }
}
