#![cfg_attr(not(feature = "std"), no_std)]

use core::ops::RangeInclusive;
use serde::{Deserialize, Serialize};

/// Represents a 2D position in world coordinates
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Raw values as supplied by the control panel, before any internal rescaling.
///
/// Weights are kept in their panel units; the simulation core divides them
/// (separation/alignment/cohesion by 100, seek/jitter by 1000) when it
/// broadcasts them to the agents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub neighbor_radius: f32,
    pub separation_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub seek_weight: f32,
    pub jitter_weight: f32,
    /// Steer towards the pointer instead of the world centre
    pub follow_target: bool,
    /// `true` wraps agents around the edges, `false` bounces them
    pub wrap_edges: bool,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            neighbor_radius: 50.0,
            separation_radius: 2.0,
            max_speed: 4.0,
            max_force: 0.1,
            separation_weight: 0.0,
            alignment_weight: 0.0,
            cohesion_weight: 0.0,
            seek_weight: 500.0,
            jitter_weight: 500.0,
            follow_target: false,
            wrap_edges: true,
        }
    }
}

impl FlockSettings {
    pub const RADIUS_RANGE: RangeInclusive<f32> = 0.0..=100.0;
    pub const MAX_SPEED_RANGE: RangeInclusive<f32> = 0.0..=10.0;
    pub const MAX_FORCE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
    pub const RULE_WEIGHT_RANGE: RangeInclusive<f32> = 0.0..=200.0;
    pub const SEEK_WEIGHT_RANGE: RangeInclusive<f32> = 0.0..=500.0;
    pub const JITTER_WEIGHT_RANGE: RangeInclusive<f32> = 0.0..=1000.0;

    /// Returns a copy with every numeric option saturated into its panel range.
    /// Non-finite values fall back to the lower bound.
    pub fn clamped(&self) -> Self {
        Self {
            neighbor_radius: saturate(self.neighbor_radius, &Self::RADIUS_RANGE),
            separation_radius: saturate(self.separation_radius, &Self::RADIUS_RANGE),
            max_speed: saturate(self.max_speed, &Self::MAX_SPEED_RANGE),
            max_force: saturate(self.max_force, &Self::MAX_FORCE_RANGE),
            separation_weight: saturate(self.separation_weight, &Self::RULE_WEIGHT_RANGE),
            alignment_weight: saturate(self.alignment_weight, &Self::RULE_WEIGHT_RANGE),
            cohesion_weight: saturate(self.cohesion_weight, &Self::RULE_WEIGHT_RANGE),
            seek_weight: saturate(self.seek_weight, &Self::SEEK_WEIGHT_RANGE),
            jitter_weight: saturate(self.jitter_weight, &Self::JITTER_WEIGHT_RANGE),
            follow_target: self.follow_target,
            wrap_edges: self.wrap_edges,
        }
    }

    pub fn is_within_ranges(&self) -> bool {
        self.clamped() == *self
    }

    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn saturate(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        *range.start()
    }
}

fn saturate_hz(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        *range.start()
    }
}

/// Maps a horizontal position onto an oscillator frequency band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrequencyMap {
    pub lowest_hz: f64,
    pub range_hz: f64,
}

impl Default for FrequencyMap {
    fn default() -> Self {
        Self {
            lowest_hz: 50.0,
            range_hz: 50.0,
        }
    }
}

impl FrequencyMap {
    pub const LOWEST_HZ_RANGE: RangeInclusive<f64> = 20.0..=4000.0;
    pub const RANGE_HZ_RANGE: RangeInclusive<f64> = 50.0..=4000.0;

    pub fn new(lowest_hz: f64, range_hz: f64) -> Self {
        Self {
            lowest_hz,
            range_hz,
        }
    }

    /// Returns a copy with both values saturated into their panel ranges.
    /// Non-finite values fall back to the lower bound.
    pub fn clamped(&self) -> Self {
        Self {
            lowest_hz: saturate_hz(self.lowest_hz, &Self::LOWEST_HZ_RANGE),
            range_hz: saturate_hz(self.range_hz, &Self::RANGE_HZ_RANGE),
        }
    }

    pub fn is_within_ranges(&self) -> bool {
        self.clamped() == *self
    }

    /// Linear map of `[0, world_width]` onto `[lowest, lowest + range]`.
    /// Positions outside the world are extrapolated, not clamped.
    pub fn frequency(&self, x: f32, world_width: f32) -> f64 {
        if world_width <= 0.0 {
            return self.lowest_hz;
        }
        self.lowest_hz + (x as f64 / world_width as f64) * self.range_hz
    }
}

/// Two-way cosmetic classification picked from an agent's colour seed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Green,
    Pink,
}

impl Palette {
    pub fn from_seed(seed: f32) -> Self {
        if seed > 0.5 {
            Palette::Green
        } else {
            Palette::Pink
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Palette::Green => (106, 174, 128),
            Palette::Pink => (226, 143, 190),
        }
    }
}

/// What the renderer reads for one agent each frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentView {
    pub position: Position,
    /// Radians, `atan2(-vy, vx)`
    pub heading: f32,
    pub palette: Palette,
}
