use crate::ecs::entity::{EntityId, INVALID_ENTITY};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Sensitivity multiplier bounds enforced by the setter.
pub const MIN_SENSITIVITY: f64 = 0.1;
pub const MAX_SENSITIVITY: f64 = 5.0;

/// Default counter-rotation gain for flight assist.
pub const DEFAULT_FLIGHT_ASSIST_STRENGTH: f64 = 0.5;

/// Below this raw input magnitude an angular axis counts as uncommanded and
/// is eligible for flight-assist damping.
pub const ASSIST_DEADZONE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    Manual,
    Assisted,
    Autopilot,
}

/// Component deciding how a command source (player input or a scripted
/// controller) becomes a thruster command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlAuthority {
    /// The commanding agent: the entity itself for player ships, a scripted
    /// controller entity, or `INVALID_ENTITY` for a dormant authority.
    pub controlled_by: EntityId,

    /// Response curve multiplier, kept in [0.1, 5.0] by `set_sensitivity`
    sensitivity: f64,

    pub flight_assist_enabled: bool,

    /// Counter-rotation gain applied on uncommanded angular axes
    pub flight_assist_strength: f64,

    pub mode: ControlMode,

    /// Commanded linear axes (strafe, vertical, thrust), pre-sensitivity
    pub input_linear: Vector3<f64>,

    /// Commanded angular axes (pitch, yaw, roll), pre-sensitivity
    pub input_angular: Vector3<f64>,
}

impl Default for ControlAuthority {
    fn default() -> Self {
        Self {
            controlled_by: INVALID_ENTITY,
            sensitivity: 1.0,
            flight_assist_enabled: false,
            flight_assist_strength: DEFAULT_FLIGHT_ASSIST_STRENGTH,
            mode: ControlMode::Manual,
            input_linear: Vector3::zeros(),
            input_angular: Vector3::zeros(),
        }
    }
}

impl ControlAuthority {
    pub fn new(controlled_by: EntityId) -> Self {
        Self {
            controlled_by,
            ..Default::default()
        }
    }

    /// Authority for a player ship: the entity commands itself with flight
    /// assist available.
    pub fn player(entity: EntityId) -> Self {
        Self {
            controlled_by: entity,
            flight_assist_enabled: true,
            mode: ControlMode::Assisted,
            ..Default::default()
        }
    }

    /// Authority driven by a scripted controller entity.
    pub fn autopilot(controller: EntityId) -> Self {
        Self {
            controlled_by: controller,
            mode: ControlMode::Autopilot,
            ..Default::default()
        }
    }

    #[inline]
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Clamp into [0.1, 5.0]; non-finite input falls back to 1.0.
    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.sensitivity = if sensitivity.is_finite() {
            sensitivity.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
        } else {
            1.0
        };
    }
}
