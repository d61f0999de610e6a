use boid_shared::{AgentView, FlockSettings, FrequencyMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::agent::Agent;
use crate::params::{AgentParams, BoundaryMode};
use crate::vector::Vector2D;

/// An append-only, ordered collection of agents sharing one tuning
#[derive(Debug, Clone)]
pub struct Flock {
    agents: Vec<Agent>,
    settings: FlockSettings,
    params: AgentParams,
    width: f32,
    height: f32,
    rng: StdRng,
}

impl Flock {
    pub fn new(width: f32, height: f32, count: usize) -> Self {
        Self::with_seed(width, height, count, rand::random())
    }

    /// Same seed, same flock: spawn locations and every agent's own random
    /// source derive from `seed`.
    pub fn with_seed(width: f32, height: f32, count: usize, seed: u64) -> Self {
        let mut flock = Self {
            agents: Vec::with_capacity(count),
            settings: FlockSettings::default(),
            params: AgentParams::default(),
            width,
            height,
            rng: StdRng::seed_from_u64(seed),
        };
        for _ in 0..count {
            flock.spawn_random();
        }
        flock
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Settings as last applied, after saturation
    pub fn settings(&self) -> &FlockSettings {
        &self.settings
    }

    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    pub fn boundary_mode(&self) -> BoundaryMode {
        BoundaryMode::from(&self.settings)
    }

    /// Geometric centre of the world
    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.width / 2.0, self.height / 2.0)
    }

    /// Where the goal pull points: the pointer when following, otherwise the
    /// world centre
    pub fn goal(&self, pointer: Vector2D, follow_target: bool) -> Vector2D {
        if follow_target {
            pointer
        } else {
            self.center()
        }
    }

    /// Append a prepared agent. Its kinematics are kept; its tuning is
    /// replaced by the flock's.
    pub fn add_agent(&mut self, mut agent: Agent) -> usize {
        agent.params = self.params;
        self.agents.push(agent);
        self.agents.len() - 1
    }

    /// Append a fresh agent at `location` and return its index
    pub fn append_agent(&mut self, location: Vector2D) -> usize {
        let seed = self.rng.gen::<u64>();
        let index = self.add_agent(Agent::new(location, seed));
        log::debug!(
            "Added agent {} at ({:.1}, {:.1})",
            index,
            location.x,
            location.y
        );
        index
    }

    /// Append an agent at a uniformly random in-bounds location. An axis
    /// with no finite positive extent spawns at 0.
    pub fn spawn_random(&mut self) -> usize {
        let x = if self.width.is_finite() && self.width > 0.0 {
            self.rng.gen_range(0.0..self.width)
        } else {
            0.0
        };
        let y = if self.height.is_finite() && self.height > 0.0 {
            self.rng.gen_range(0.0..self.height)
        } else {
            0.0
        };
        self.append_agent(Vector2D::new(x, y))
    }

    /// Broadcast one configuration to every agent. Out-of-range values are
    /// saturated first. Applying the same settings again changes nothing.
    pub fn apply_settings(&mut self, settings: &FlockSettings) {
        let clamped = settings.clamped();
        let changed = clamped != self.settings;

        if changed && clamped != *settings {
            log::warn!("Flock settings out of range, saturated to {:?}", clamped);
        }

        self.settings = clamped;
        self.params = AgentParams::from(&clamped);
        for agent in self.agents.iter_mut() {
            agent.params = self.params;
        }

        if changed {
            log::debug!(
                "Applied settings to {} agents: {:?}",
                self.agents.len(),
                self.params
            );
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width != self.width || height != self.height {
            log::debug!("Resized world to {}x{}", width, height);
        }
        self.width = width;
        self.height = height;
    }

    /// Advance one frame.
    ///
    /// Every agent first integrates the force stored by the previous frame.
    /// The steering phase then reads the post-integration state of the whole
    /// flock and only afterwards are the new forces committed and the
    /// boundary applied, so a force always lands one frame after it was
    /// computed.
    pub fn tick(&mut self, pointer: Vector2D, follow_target: bool, mode: BoundaryMode) {
        for agent in self.agents.iter_mut() {
            agent.integrate();
        }

        let goal = self.goal(pointer, follow_target);
        let jitter: Vec<Vector2D> = self.agents.iter_mut().map(Agent::draw_jitter).collect();
        let forces = self.steering_phase(goal, &jitter);

        for (agent, force) in self.agents.iter_mut().zip(forces) {
            agent.accumulated_force = force;
            agent.apply_boundary(mode, self.width, self.height);
        }
    }

    /// `tick` driven by the follow and wrap flags of the applied settings
    pub fn step(&mut self, pointer: Vector2D) {
        let follow_target = self.settings.follow_target;
        let mode = self.boundary_mode();
        self.tick(pointer, follow_target, mode);
    }

    #[cfg(not(feature = "parallel"))]
    fn steering_phase(&self, goal: Vector2D, jitter: &[Vector2D]) -> Vec<Vector2D> {
        let snapshot = self.agents.as_slice();
        snapshot
            .iter()
            .zip(jitter)
            .map(|(agent, &jitter)| agent.compute_steering(snapshot, goal, jitter))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn steering_phase(&self, goal: Vector2D, jitter: &[Vector2D]) -> Vec<Vector2D> {
        let snapshot = self.agents.as_slice();
        snapshot
            .par_iter()
            .zip(jitter.par_iter())
            .map(|(agent, &jitter)| agent.compute_steering(snapshot, goal, jitter))
            .collect()
    }

    /// Render view of each agent, in sequence order
    pub fn views(&self) -> Vec<AgentView> {
        self.agents.iter().map(Agent::view).collect()
    }

    /// One oscillator frequency per agent from its horizontal position
    pub fn frequencies(&self, map: &FrequencyMap) -> Vec<f64> {
        self.agents
            .iter()
            .map(|agent| map.frequency(agent.location.x, self.width))
            .collect()
    }
}
