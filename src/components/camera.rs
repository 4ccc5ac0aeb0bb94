use crate::ecs::entity::{EntityId, INVALID_ENTITY};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Component for a chase camera tracking a target entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightCamera {
    /// Entity whose transform the camera follows
    pub target: EntityId,

    /// Offset from the target in the target's body frame [m]
    pub offset: Vector3<f64>,

    /// Fraction of the remaining distance closed per update, in [0, 1]
    pub interpolation_factor: f64,
}

impl Default for FlightCamera {
    fn default() -> Self {
        Self {
            target: INVALID_ENTITY,
            offset: Vector3::new(0.0, 4.0, -12.0),
            interpolation_factor: 0.1,
        }
    }
}

impl FlightCamera {
    pub fn follow(target: EntityId) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }
}
