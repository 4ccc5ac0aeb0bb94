use crate::components::physics::Environment;
use crate::math::clamp_axes;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Component for an entity's propulsion capability. Commands are
/// body-relative and normalized; the thruster system turns them into
/// world-frame force and torque through the owning transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thruster {
    /// Maximum force along each body axis [N]
    pub max_linear_force: Vector3<f64>,

    /// Maximum torque about each body axis [N⋅m]
    pub max_angular_torque: Vector3<f64>,

    /// Commanded linear thrust per body axis, each in [-1, 1]
    pub current_linear_thrust: Vector3<f64>,

    /// Commanded angular thrust per body axis, each in [-1, 1]
    pub current_angular_thrust: Vector3<f64>,

    pub enabled: bool,

    /// Output fraction available in atmosphere, in [0, 1]
    pub atmosphere_efficiency: f64,

    /// Output fraction available in vacuum, in [0, 1]
    pub vacuum_efficiency: f64,
}

impl Default for Thruster {
    fn default() -> Self {
        Self {
            max_linear_force: Vector3::new(1000.0, 1000.0, 1000.0),
            max_angular_torque: Vector3::new(100.0, 100.0, 100.0),
            current_linear_thrust: Vector3::zeros(),
            current_angular_thrust: Vector3::zeros(),
            enabled: true,
            atmosphere_efficiency: 0.8,
            vacuum_efficiency: 1.0,
        }
    }
}

impl Thruster {
    pub fn new(max_linear_force: Vector3<f64>, max_angular_torque: Vector3<f64>) -> Self {
        Self {
            max_linear_force,
            max_angular_torque,
            ..Default::default()
        }
    }

    /// Set the linear command, clamping each component into [-1, 1].
    pub fn set_linear_command(&mut self, command: Vector3<f64>) {
        self.current_linear_thrust = clamp_axes(command);
    }

    /// Set the angular command, clamping each component into [-1, 1].
    pub fn set_angular_command(&mut self, command: Vector3<f64>) {
        self.current_angular_thrust = clamp_axes(command);
    }

    /// Output fraction for the given medium.
    #[inline]
    pub fn efficiency(&self, environment: Environment) -> f64 {
        match environment {
            Environment::Atmosphere => self.atmosphere_efficiency.clamp(0.0, 1.0),
            Environment::Space => self.vacuum_efficiency.clamp(0.0, 1.0),
        }
    }
}
