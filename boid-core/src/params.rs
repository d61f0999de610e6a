use boid_shared::FlockSettings;

/// Panel separation/alignment/cohesion weights arrive in `[0, 200]`
pub const RULE_WEIGHT_DIVISOR: f32 = 100.0;
/// Panel seek weight arrives in `[0, 500]`
pub const SEEK_WEIGHT_DIVISOR: f32 = 1000.0;
/// Panel jitter weight arrives in `[0, 1000]`
pub const JITTER_WEIGHT_DIVISOR: f32 = 1000.0;

/// How agents are kept inside the world once their steering is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryMode {
    /// Teleport to the opposite edge once past the edge by the drawn half-size
    Wrap,
    /// Clamp onto the edge and reflect the crossing velocity component
    Bounce,
}

impl BoundaryMode {
    pub fn from_wrap_flag(wrap: bool) -> Self {
        if wrap {
            BoundaryMode::Wrap
        } else {
            BoundaryMode::Bounce
        }
    }
}

impl From<&FlockSettings> for BoundaryMode {
    fn from(settings: &FlockSettings) -> Self {
        BoundaryMode::from_wrap_flag(settings.wrap_edges)
    }
}

/// Multipliers applied to each rule's contribution, already rescaled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
    pub seek: f32,
    pub jitter: f32,
}

impl Weights {
    pub fn zero() -> Self {
        Self {
            separation: 0.0,
            alignment: 0.0,
            cohesion: 0.0,
            seek: 0.0,
            jitter: 0.0,
        }
    }
}

/// Tuning every agent carries. The flock keeps them identical across agents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentParams {
    pub max_speed: f32,
    pub max_force: f32,
    /// Alignment and cohesion consider neighbours closer than this
    pub neighbor_radius: f32,
    /// Separation considers neighbours closer than this
    pub separation_radius: f32,
    pub weights: Weights,
}

impl Default for AgentParams {
    fn default() -> Self {
        AgentParams::from(&FlockSettings::default())
    }
}

impl From<&FlockSettings> for AgentParams {
    fn from(settings: &FlockSettings) -> Self {
        Self {
            max_speed: settings.max_speed,
            max_force: settings.max_force,
            neighbor_radius: settings.neighbor_radius,
            separation_radius: settings.separation_radius,
            weights: Weights {
                separation: settings.separation_weight / RULE_WEIGHT_DIVISOR,
                alignment: settings.alignment_weight / RULE_WEIGHT_DIVISOR,
                cohesion: settings.cohesion_weight / RULE_WEIGHT_DIVISOR,
                seek: settings.seek_weight / SEEK_WEIGHT_DIVISOR,
                jitter: settings.jitter_weight / JITTER_WEIGHT_DIVISOR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_are_rescaled() {
        let settings = FlockSettings {
            separation_weight: 100.0,
            alignment_weight: 200.0,
            cohesion_weight: 50.0,
            seek_weight: 500.0,
            jitter_weight: 250.0,
            ..FlockSettings::default()
        };
        let params = AgentParams::from(&settings);
        assert_eq!(params.weights.separation, 1.0);
        assert_eq!(params.weights.alignment, 2.0);
        assert_eq!(params.weights.cohesion, 0.5);
        assert_eq!(params.weights.seek, 0.5);
        assert_eq!(params.weights.jitter, 0.25);
    }

    #[test]
    fn test_default_params_match_panel_defaults() {
        let params = AgentParams::default();
        assert_eq!(params.max_speed, 4.0);
        assert_eq!(params.max_force, 0.1);
        assert_eq!(params.neighbor_radius, 50.0);
        assert_eq!(params.separation_radius, 2.0);
        assert_eq!(params.weights.separation, 0.0);
        assert_eq!(params.weights.jitter, 0.5);
    }

    #[test]
    fn test_boundary_mode_flag() {
        assert_eq!(BoundaryMode::from_wrap_flag(true), BoundaryMode::Wrap);
        let settings = FlockSettings {
            wrap_edges: false,
            ..FlockSettings::default()
        };
        assert_eq!(BoundaryMode::from(&settings), BoundaryMode::Bounce);
    }
}
