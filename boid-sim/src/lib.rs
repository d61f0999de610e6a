pub mod config;
pub mod driver;

pub use config::{parse_position, SimConfig, WorldSize};
pub use driver::{FrameReport, Simulation};
