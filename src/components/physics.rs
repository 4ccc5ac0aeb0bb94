use crate::ecs::error::{EcsError, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Medium the body moves through; selects the thruster efficiency scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Space,
    Atmosphere,
}

/// Component for 6-DOF rigid-body state and the per-frame force/torque
/// accumulators the integrator consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsComponent {
    /// Mass [kg]; non-positive mass disables linear integration
    pub mass: f64,

    /// Diagonal moment of inertia about the principal axes [kg⋅m²]
    pub moment_of_inertia: Vector3<f64>,

    /// Linear velocity in world space [m/s]
    pub velocity: Vector3<f64>,

    /// Angular velocity in world space [rad/s]
    pub angular_velocity: Vector3<f64>,

    /// Linear acceleration from the last integration step [m/s²]
    #[serde(skip)]
    pub acceleration: Vector3<f64>,

    /// Angular acceleration from the last integration step [rad/s²]
    #[serde(skip)]
    pub angular_acceleration: Vector3<f64>,

    /// Net force accumulated this frame, world space [N]
    #[serde(skip)]
    pub force_accumulator: Vector3<f64>,

    /// Net torque accumulated this frame, world space [N⋅m]
    #[serde(skip)]
    pub torque_accumulator: Vector3<f64>,

    /// Velocity retention per reference frame; 1.0 = no drag, 0.0 = halt
    pub drag_linear: f64,

    /// Angular velocity retention per reference frame
    pub drag_angular: f64,

    pub environment: Environment,

    /// When false, all angular state is held at zero
    pub has_6dof: bool,

    /// When true, the integrator leaves velocity and pose untouched
    pub kinematic: bool,
}

impl Default for PhysicsComponent {
    fn default() -> Self {
        Self {
            mass: 1.0,
            moment_of_inertia: Vector3::new(1.0, 1.0, 1.0),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            angular_acceleration: Vector3::zeros(),
            force_accumulator: Vector3::zeros(),
            torque_accumulator: Vector3::zeros(),
            drag_linear: 1.0,
            drag_angular: 1.0,
            environment: Environment::Space,
            has_6dof: true,
            kinematic: false,
        }
    }
}

impl PhysicsComponent {
    /// Create a body with validated mass and inertia.
    pub fn new(mass: f64, moment_of_inertia: Vector3<f64>) -> Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(EcsError::Domain(format!(
                "mass must be finite and positive, got {mass}"
            )));
        }
        if moment_of_inertia
            .iter()
            .any(|&i| !i.is_finite() || i <= 0.0)
        {
            return Err(EcsError::Domain(format!(
                "moment of inertia must be finite and positive on every axis, got {moment_of_inertia:?}"
            )));
        }

        Ok(Self {
            mass,
            moment_of_inertia,
            ..Default::default()
        })
    }

    /// Straight add into the force accumulator (world frame).
    #[inline]
    pub fn add_force(&mut self, force: Vector3<f64>) {
        self.force_accumulator += force;
    }

    /// Add torque (world frame); ignored for bodies without 6-DOF.
    #[inline]
    pub fn add_torque(&mut self, torque: Vector3<f64>) {
        if self.has_6dof {
            self.torque_accumulator += torque;
        }
    }

    /// Apply a force at a world-space point, adding the moment arm
    /// `(point − com) × f` as torque when the body has 6-DOF.
    pub fn add_force_at_point(
        &mut self,
        force: Vector3<f64>,
        application_point: Vector3<f64>,
        center_of_mass: Vector3<f64>,
    ) {
        self.force_accumulator += force;
        if self.has_6dof {
            self.torque_accumulator += (application_point - center_of_mass).cross(&force);
        }
    }

    pub fn clear_accumulators(&mut self) {
        self.force_accumulator = Vector3::zeros();
        self.torque_accumulator = Vector3::zeros();
    }

    /// Clamp drag retentions into [0, 1]; out-of-range input is a caller
    /// mistake that degrades to the nearest legal value.
    pub fn set_drag(&mut self, linear: f64, angular: f64) {
        self.drag_linear = if linear.is_finite() {
            linear.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.drag_angular = if angular.is_finite() {
            angular.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    /// Translational plus rotational kinetic energy [J].
    pub fn kinetic_energy(&self) -> f64 {
        let translational = 0.5 * self.mass * self.velocity.norm_squared();
        let rotational = 0.5
            * self
                .angular_velocity
                .component_mul(&self.angular_velocity)
                .dot(&self.moment_of_inertia);
        translational + rotational
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_invalid_mass() {
        assert!(PhysicsComponent::new(0.0, Vector3::new(1.0, 1.0, 1.0)).is_err());
        assert!(PhysicsComponent::new(-1.0, Vector3::new(1.0, 1.0, 1.0)).is_err());
        assert!(PhysicsComponent::new(f64::NAN, Vector3::new(1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn test_rejects_invalid_inertia() {
        assert!(PhysicsComponent::new(1.0, Vector3::new(1.0, 0.0, 1.0)).is_err());
        assert!(PhysicsComponent::new(1.0, Vector3::new(1.0, -2.0, 1.0)).is_err());
    }

    #[test]
    fn test_force_at_point_produces_moment_arm() {
        let mut body = PhysicsComponent::new(1.0, Vector3::new(1.0, 1.0, 1.0)).unwrap();
        body.add_force_at_point(
            Vector3::new(0.0, 10.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::zeros(),
        );

        assert_relative_eq!(body.force_accumulator.y, 10.0);
        // (1,0,0) × (0,10,0) = (0,0,10)
        assert_relative_eq!(body.torque_accumulator.z, 10.0);
    }

    #[test]
    fn test_torque_ignored_without_6dof() {
        let mut body = PhysicsComponent::default();
        body.has_6dof = false;
        body.add_torque(Vector3::new(0.0, 0.0, 5.0));
        body.add_force_at_point(Vector3::y(), Vector3::x(), Vector3::zeros());
        assert_eq!(body.torque_accumulator, Vector3::zeros());
    }

    #[test]
    fn test_set_drag_clamps() {
        let mut body = PhysicsComponent::default();
        body.set_drag(1.5, -0.2);
        assert_relative_eq!(body.drag_linear, 1.0);
        assert_relative_eq!(body.drag_angular, 0.0);
    }

    #[test]
    fn test_kinetic_energy() {
        let mut body = PhysicsComponent::new(2.0, Vector3::new(1.0, 1.0, 1.0)).unwrap();
        body.velocity = Vector3::new(1.0, 0.0, 0.0);
        body.angular_velocity = Vector3::new(0.0, 0.0, 1.0);
        // 0.5·2·1 + 0.5·1·1 = 1.5
        assert_relative_eq!(body.kinetic_energy(), 1.5);
    }
}
