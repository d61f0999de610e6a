use boid_shared::{AgentView, Palette, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::behavior;
use crate::params::{AgentParams, BoundaryMode, Weights};
use crate::vector::Vector2D;

/// Drawn half-size of an agent; the wrap policy lets agents leave the
/// world by this much before teleporting them.
pub const AGENT_RADIUS: f32 = 3.0;

/// Unweighted output of each steering rule for one agent and one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub separation: Vector2D,
    pub alignment: Vector2D,
    pub cohesion: Vector2D,
    pub goal: Vector2D,
    pub jitter: Vector2D,
}

impl Steering {
    /// Weighted sum. The total is not clamped again.
    pub fn combine(&self, weights: &Weights) -> Vector2D {
        self.separation * weights.separation
            + self.alignment * weights.alignment
            + self.cohesion * weights.cohesion
            + self.goal * weights.seek
            + self.jitter * weights.jitter
    }
}

/// A single boid
#[derive(Debug, Clone)]
pub struct Agent {
    pub location: Vector2D,
    pub velocity: Vector2D,
    /// Force computed during the last steering phase, consumed by the next
    /// integration
    pub accumulated_force: Vector2D,
    pub params: AgentParams,
    color_seed: f32,
    rng: StdRng,
}

impl Agent {
    /// Creates an agent heading in a random direction at unit speed. All of
    /// its randomness comes from `seed`.
    pub fn new(location: Vector2D, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let velocity = behavior::jitter(&mut rng);
        let color_seed = rng.gen::<f32>();

        Self {
            location,
            velocity,
            accumulated_force: Vector2D::zero(),
            params: AgentParams::default(),
            color_seed,
            rng,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2D) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_params(mut self, params: AgentParams) -> Self {
        self.params = params;
        self
    }

    pub fn color_seed(&self) -> f32 {
        self.color_seed
    }

    pub fn palette(&self) -> Palette {
        Palette::from_seed(self.color_seed)
    }

    /// Facing angle in radians with y pointing down the screen
    pub fn heading(&self) -> f32 {
        (-self.velocity.y).atan2(self.velocity.x)
    }

    pub fn view(&self) -> AgentView {
        AgentView {
            position: Position::new(self.location.x, self.location.y),
            heading: self.heading(),
            palette: self.palette(),
        }
    }

    /// Consume the stored force: accelerate, cap speed, move.
    pub fn integrate(&mut self) {
        self.velocity += self.accumulated_force;
        self.velocity = self.velocity.limit(self.params.max_speed);
        self.location += self.velocity;
        self.accumulated_force = Vector2D::zero();
    }

    /// Draw this frame's jitter from the agent's own random source
    pub fn draw_jitter(&mut self) -> Vector2D {
        behavior::jitter(&mut self.rng)
    }

    /// Evaluate every rule against `snapshot`, which may include this agent
    /// itself (zero-distance entries are skipped).
    pub fn steering(&self, snapshot: &[Agent], goal: Vector2D, jitter: Vector2D) -> Steering {
        Steering {
            separation: behavior::separation(self, snapshot),
            alignment: behavior::alignment(self, snapshot),
            cohesion: behavior::cohesion(self, snapshot),
            goal: behavior::goal_pull(self, goal),
            jitter,
        }
    }

    /// The force to store for the next frame
    pub fn compute_steering(&self, snapshot: &[Agent], goal: Vector2D, jitter: Vector2D) -> Vector2D {
        self.steering(snapshot, goal, jitter).combine(&self.params.weights)
    }

    /// Keep the agent in a `width` x `height` world. Axes are handled
    /// independently.
    pub fn apply_boundary(&mut self, mode: BoundaryMode, width: f32, height: f32) {
        match mode {
            BoundaryMode::Wrap => {
                let r = AGENT_RADIUS;
                if self.location.x < -r {
                    self.location.x = width + r;
                } else if self.location.x > width + r {
                    self.location.x = -r;
                }

                if self.location.y < -r {
                    self.location.y = height + r;
                } else if self.location.y > height + r {
                    self.location.y = -r;
                }
            }
            BoundaryMode::Bounce => {
                if self.location.x < 0.0 {
                    self.location.x = 0.0;
                    self.velocity.x = -self.velocity.x;
                } else if self.location.x > width {
                    self.location.x = width;
                    self.velocity.x = -self.velocity.x;
                }

                if self.location.y < 0.0 {
                    self.location.y = 0.0;
                    self.velocity.y = -self.velocity.y;
                } else if self.location.y > height {
                    self.location.y = height;
                    self.velocity.y = -self.velocity.y;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_creation_is_seeded() {
        let a = Agent::new(Vector2D::new(10.0, 20.0), 42);
        let b = Agent::new(Vector2D::new(10.0, 20.0), 42);

        assert_eq!(a.location, Vector2D::new(10.0, 20.0));
        assert_eq!(a.velocity, b.velocity);
        assert_eq!(a.color_seed(), b.color_seed());
        assert!((a.velocity.magnitude() - 1.0).abs() < 1e-5);
        assert!((0.0..1.0).contains(&a.color_seed()));
        assert_eq!(a.accumulated_force, Vector2D::zero());
    }

    #[test]
    fn test_integrate_consumes_force() {
        let mut agent = Agent::new(Vector2D::zero(), 1).with_velocity(Vector2D::new(1.0, 0.0));
        agent.accumulated_force = Vector2D::new(0.0, 1.0);

        agent.integrate();

        assert_eq!(agent.velocity, Vector2D::new(1.0, 1.0));
        assert_eq!(agent.location, Vector2D::new(1.0, 1.0));
        assert_eq!(agent.accumulated_force, Vector2D::zero());
    }

    #[test]
    fn test_integrate_caps_speed() {
        let mut agent = Agent::new(Vector2D::zero(), 1).with_velocity(Vector2D::new(3.0, 0.0));
        agent.accumulated_force = Vector2D::new(30.0, 40.0);

        agent.integrate();

        assert!(agent.velocity.magnitude() <= agent.params.max_speed + 1e-5);
        let before = agent.velocity;
        agent.integrate();
        assert!((agent.velocity - before).magnitude() < 1e-5);
    }

    #[test]
    fn test_heading_uses_screen_orientation() {
        let right = Agent::new(Vector2D::zero(), 1).with_velocity(Vector2D::new(1.0, 0.0));
        assert_eq!(right.heading(), 0.0);

        let down = Agent::new(Vector2D::zero(), 1).with_velocity(Vector2D::new(0.0, 1.0));
        assert!((down.heading() + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_teleports_exactly() {
        let mut agent = Agent::new(Vector2D::new(-AGENT_RADIUS - 0.5, 50.0), 1);
        agent.apply_boundary(BoundaryMode::Wrap, 800.0, 600.0);
        assert_eq!(agent.location, Vector2D::new(800.0 + AGENT_RADIUS, 50.0));

        agent.location = Vector2D::new(400.0, 600.0 + AGENT_RADIUS + 0.1);
        agent.apply_boundary(BoundaryMode::Wrap, 800.0, 600.0);
        assert_eq!(agent.location, Vector2D::new(400.0, -AGENT_RADIUS));
    }

    #[test]
    fn test_wrap_tolerates_the_drawn_margin() {
        let mut agent = Agent::new(Vector2D::new(-1.0, 601.0), 1);
        agent.apply_boundary(BoundaryMode::Wrap, 800.0, 600.0);
        assert_eq!(agent.location, Vector2D::new(-1.0, 601.0));
    }

    #[test]
    fn test_bounce_reflects_one_axis() {
        let mut agent = Agent::new(Vector2D::new(805.0, 300.0), 1)
            .with_velocity(Vector2D::new(2.0, 1.5));
        agent.apply_boundary(BoundaryMode::Bounce, 800.0, 600.0);

        assert_eq!(agent.location, Vector2D::new(800.0, 300.0));
        assert_eq!(agent.velocity, Vector2D::new(-2.0, 1.5));
    }

    #[test]
    fn test_bounce_both_axes() {
        let mut agent = Agent::new(Vector2D::new(-1.0, -2.0), 1)
            .with_velocity(Vector2D::new(-1.0, -1.0));
        agent.apply_boundary(BoundaryMode::Bounce, 800.0, 600.0);

        assert_eq!(agent.location, Vector2D::zero());
        assert_eq!(agent.velocity, Vector2D::new(1.0, 1.0));
    }

    #[test]
    fn test_steering_sum_is_weighted_not_clamped() {
        let params = AgentParams {
            weights: Weights {
                seek: 1.0,
                jitter: 1.0,
                ..Weights::zero()
            },
            ..AgentParams::default()
        };
        let agent = Agent::new(Vector2D::zero(), 1)
            .with_velocity(Vector2D::zero())
            .with_params(params);

        let force = agent.compute_steering(
            std::slice::from_ref(&agent),
            Vector2D::new(500.0, 0.0),
            Vector2D::new(0.0, 1.0),
        );
        assert_eq!(force, Vector2D::new(5.0, 1.0));
        assert!(force.magnitude() > agent.params.max_force);
    }
}
