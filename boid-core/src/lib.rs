//! Flock simulation core: agents, steering rules and the per-frame driver.

pub mod agent;
pub mod behavior;
pub mod flock;
pub mod params;
pub mod vector;

pub use agent::{Agent, Steering, AGENT_RADIUS};
pub use flock::Flock;
pub use params::{AgentParams, BoundaryMode, Weights};
pub use vector::Vector2D;
