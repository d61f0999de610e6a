use std::io::Write;

use anyhow::{Context, Result};
use boid_core::{Flock, Vector2D};
use boid_shared::{AgentView, FlockSettings, Position};
use serde::{Deserialize, Serialize};

use crate::config::{SimConfig, WorldSize};

/// What the collaborators read after one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame: u64,
    pub agents: Vec<AgentView>,
    /// Oscillator frequency per agent, same order as `agents`
    pub frequencies: Vec<f64>,
}

/// Stands in for the application's frame loop: tunes, spawns, ticks and
/// reads the flock once per frame.
pub struct Simulation {
    flock: Flock,
    config: SimConfig,
    frame: u64,
}

impl Simulation {
    pub fn new(mut config: SimConfig) -> Result<Self> {
        config.validate()?;
        config.audio = config.audio.clamped();

        let WorldSize { width, height } = config.world;
        let mut flock = match config.seed {
            Some(seed) => Flock::with_seed(width, height, config.agents, seed),
            None => Flock::new(width, height, config.agents),
        };
        flock.apply_settings(&config.settings);

        log::info!(
            "Initialised flock of {} agents in a {}x{} world",
            flock.len(),
            width,
            height
        );

        Ok(Self {
            flock,
            config,
            frame: 0,
        })
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn set_pointer(&mut self, pointer: Position) {
        self.config.pointer = pointer;
    }

    /// Picked up at the start of the next frame
    pub fn set_settings(&mut self, settings: FlockSettings) {
        self.config.settings = settings;
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        let world = WorldSize { width, height };
        let candidate = SimConfig {
            world,
            ..self.config.clone()
        };
        candidate.validate().context("Rejected resize")?;
        self.config.world = world;
        self.flock.resize(width, height);
        Ok(())
    }

    /// Append one agent at a random in-bounds location
    pub fn spawn(&mut self) -> usize {
        let index = self.flock.spawn_random();
        log::info!("Spawned agent {}, flock size {}", index, self.flock.len());
        index
    }

    /// Run one frame and report what the renderer and audio sink see
    pub fn advance(&mut self) -> FrameReport {
        self.flock.apply_settings(&self.config.settings);

        if let Some(every) = self.config.spawn_every {
            if every > 0 && self.frame > 0 && self.frame % every == 0 {
                self.spawn();
            }
        }

        let pointer = Vector2D::new(self.config.pointer.x, self.config.pointer.y);
        self.flock.step(pointer);
        self.frame += 1;

        self.report()
    }

    pub fn report(&self) -> FrameReport {
        FrameReport {
            frame: self.frame,
            agents: self.flock.views(),
            frequencies: self.flock.frequencies(&self.config.audio),
        }
    }

    /// Advance `frames` times, writing one JSON report per line
    pub fn run<W: Write>(&mut self, frames: u64, mut out: W) -> Result<()> {
        log::info!("Running {} frames", frames);

        for _ in 0..frames {
            let report = self.advance();
            serde_json::to_writer(&mut out, &report)
                .with_context(|| format!("Failed to write report for frame {}", report.frame))?;
            writeln!(out).context("Failed to write report separator")?;

            if report.frame % 100 == 0 {
                log::debug!("Frame {}: {} agents", report.frame, report.agents.len());
            }
        }

        out.flush().context("Failed to flush output")?;
        log::info!("Finished after {} frames", self.frame);
        Ok(())
    }
}
