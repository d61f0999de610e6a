//! Steering rules. Every function is pure: it reads the agent and its
//! neighbours and returns an unweighted force.

use std::f32::consts::TAU;

use rand::Rng;

use crate::agent::Agent;
use crate::vector::Vector2D;

/// The goal pull is divided by this instead of being normalised, so it
/// grows with distance from the goal.
pub const GOAL_PULL_DIVISOR: f32 = 100.0;

/// Steer away from neighbours closer than the separation radius. Closer
/// neighbours weigh more.
pub fn separation<'a, I>(agent: &Agent, others: I) -> Vector2D
where
    I: IntoIterator<Item = &'a Agent>,
{
    let mut steering = Vector2D::zero();
    let mut count = 0;

    for other in others {
        let distance = agent.location.distance(&other.location);
        if distance > 0.0 && distance < agent.params.separation_radius {
            let diff = (agent.location - other.location).normalize();
            steering += diff / distance;
            count += 1;
        }
    }

    if count > 0 {
        steering = steering / count as f32;
    }

    desired_minus_velocity(agent, steering)
}

/// Steer towards the average velocity of neighbours within the neighbour radius
pub fn alignment<'a, I>(agent: &Agent, others: I) -> Vector2D
where
    I: IntoIterator<Item = &'a Agent>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        let distance = agent.location.distance(&other.location);
        if distance > 0.0 && distance < agent.params.neighbor_radius {
            sum += other.velocity;
            count += 1;
        }
    }

    if count > 0 {
        sum = sum / count as f32;
    }

    desired_minus_velocity(agent, sum)
}

/// Seek the average location of neighbours within the neighbour radius
pub fn cohesion<'a, I>(agent: &Agent, others: I) -> Vector2D
where
    I: IntoIterator<Item = &'a Agent>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        let distance = agent.location.distance(&other.location);
        if distance > 0.0 && distance < agent.params.neighbor_radius {
            sum += other.location;
            count += 1;
        }
    }

    if count > 0 {
        sum = sum / count as f32;
        seek(agent, sum)
    } else {
        Vector2D::zero()
    }
}

/// Reynolds seek: full-speed desire towards `target`, minus current
/// velocity, clamped to the agent's max force. Zero when already there.
pub fn seek(agent: &Agent, target: Vector2D) -> Vector2D {
    let desired = target - agent.location;
    let distance = desired.magnitude();
    if distance > 0.0 {
        let desired = desired / distance * agent.params.max_speed;
        (desired - agent.velocity).limit(agent.params.max_force)
    } else {
        Vector2D::zero()
    }
}

/// Fractional pull towards the flock goal, never clamped
pub fn goal_pull(agent: &Agent, goal: Vector2D) -> Vector2D {
    (goal - agent.location) / GOAL_PULL_DIVISOR
}

/// Random unit vector; left unclamped on purpose
pub fn jitter<R: Rng + ?Sized>(rng: &mut R) -> Vector2D {
    Vector2D::from_angle(rng.gen_range(0.0..TAU))
}

// Shared tail of separation and alignment. A zero desire produces no force.
fn desired_minus_velocity(agent: &Agent, desired: Vector2D) -> Vector2D {
    if desired.is_zero() {
        return Vector2D::zero();
    }
    (desired.with_magnitude(agent.params.max_speed) - agent.velocity).limit(agent.params.max_force)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::AgentParams;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still(x: f32, y: f32) -> Agent {
        Agent::new(Vector2D::new(x, y), 7).with_velocity(Vector2D::zero())
    }

    fn moving(x: f32, y: f32, vx: f32, vy: f32) -> Agent {
        Agent::new(Vector2D::new(x, y), 7).with_velocity(Vector2D::new(vx, vy))
    }

    #[test]
    fn test_separation_points_away() {
        let params = AgentParams {
            separation_radius: 10.0,
            ..AgentParams::default()
        };
        let me = still(50.0, 50.0).with_params(params);
        let neighbour = still(53.0, 51.0);
        let flock = [me.clone(), neighbour.clone(), still(90.0, 90.0)];

        let force = separation(&me, flock.iter());
        assert!(force.dot(&(me.location - neighbour.location)) > 0.0);
        assert!(force.magnitude() <= me.params.max_force + 1e-6);
    }

    #[test]
    fn test_separation_nearest_dominates() {
        let params = AgentParams {
            separation_radius: 20.0,
            ..AgentParams::default()
        };
        let me = still(0.0, 0.0).with_params(params);
        let flock = [me.clone(), still(1.0, 0.0), still(-15.0, 0.0)];

        let force = separation(&me, flock.iter());
        assert!(force.x < 0.0);
    }

    #[test]
    fn test_separation_ignores_coincident_and_far() {
        let me = still(10.0, 10.0);
        let flock = [me.clone(), still(10.0, 10.0), still(40.0, 10.0)];
        assert_eq!(separation(&me, flock.iter()), Vector2D::zero());
    }

    #[test]
    fn test_alignment_matches_neighbour_heading() {
        let me = moving(0.0, 0.0, 0.0, 1.0);
        let flock = [me.clone(), moving(5.0, 0.0, 1.0, 0.0)];
        let force = alignment(&me, flock.iter());
        assert!(force.x > 0.0);
        assert!(force.y < 0.0);
        assert!((force.magnitude() - me.params.max_force).abs() < 1e-5);
    }

    #[test]
    fn test_alignment_zero_when_neighbours_cancel() {
        let me = moving(0.0, 0.0, 0.0, 1.0);
        let flock = [
            me.clone(),
            moving(5.0, 0.0, 1.0, 0.0),
            moving(-5.0, 0.0, -1.0, 0.0),
        ];
        assert_eq!(alignment(&me, flock.iter()), Vector2D::zero());
    }

    #[test]
    fn test_isolated_agent_has_no_neighbour_forces() {
        let me = moving(0.0, 0.0, 1.0, 1.0);
        let flock = [me.clone(), still(500.0, 500.0)];
        assert_eq!(cohesion(&me, flock.iter()), Vector2D::zero());
        assert_eq!(alignment(&me, flock.iter()), Vector2D::zero());
        assert_eq!(separation(&me, flock.iter()), Vector2D::zero());
        assert_eq!(cohesion(&me, std::iter::once(&me)), Vector2D::zero());
    }

    #[test]
    fn test_cohesion_pulls_towards_centre() {
        let me = still(0.0, 0.0);
        let flock = [me.clone(), still(10.0, 0.0), still(10.0, 10.0)];
        let force = cohesion(&me, flock.iter());
        assert!(force.x > 0.0 && force.y > 0.0);
        assert!(force.x > force.y);
    }

    #[test]
    fn test_seek_on_target_is_zero() {
        let me = moving(12.0, 34.0, 1.0, 0.0);
        assert_eq!(seek(&me, Vector2D::new(12.0, 34.0)), Vector2D::zero());
    }

    #[test]
    fn test_seek_is_clamped() {
        let me = still(0.0, 0.0);
        let force = seek(&me, Vector2D::new(100.0, 0.0));
        assert!((force.x - me.params.max_force).abs() < 1e-6);
        assert_eq!(force.y, 0.0);
    }

    #[test]
    fn test_goal_pull_scales_with_distance() {
        let me = still(0.0, 0.0);
        assert_eq!(goal_pull(&me, Vector2D::new(200.0, -100.0)), Vector2D::new(2.0, -1.0));
        assert_eq!(goal_pull(&me, me.location), Vector2D::zero());
    }

    #[test]
    fn test_jitter_is_unit_and_seeded() {
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        for _ in 0..32 {
            let va = jitter(&mut a);
            assert!((va.magnitude() - 1.0).abs() < 1e-5);
            assert_eq!(va, jitter(&mut b));
        }
    }
}
