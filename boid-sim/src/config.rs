use std::path::Path;

use anyhow::{Context, Result};
use boid_shared::{FlockSettings, FrequencyMap, Position};
use serde::{Deserialize, Serialize};

/// Width and height of the simulated area
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldSize {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldSize {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Everything a run needs. Every field is optional in the JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub settings: FlockSettings,
    pub audio: FrequencyMap,
    pub world: WorldSize,
    /// Size of the initial flock
    pub agents: usize,
    /// Fixed seed for a reproducible run
    pub seed: Option<u64>,
    /// Pointer position used when `settings.follow_target` is on
    pub pointer: Position,
    /// Append one random agent every this many frames
    pub spawn_every: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            settings: FlockSettings::default(),
            audio: FrequencyMap::default(),
            world: WorldSize::default(),
            agents: 100,
            seed: None,
            pointer: Position::default(),
            spawn_every: None,
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid simulation config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        let WorldSize { width, height } = self.world;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            anyhow::bail!("World size must be positive, got {}x{}", width, height);
        }
        if !self.audio.is_within_ranges() {
            log::warn!(
                "Audio band {:?} is out of range and will be saturated",
                self.audio
            );
        }
        if !self.settings.is_within_ranges() {
            log::warn!("Some flock settings are out of range and will be saturated");
        }
        Ok(())
    }
}

/// Parses `X,Y` into a position
pub fn parse_position(s: &str) -> std::result::Result<Position, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok(Position::new(x, y))
}
