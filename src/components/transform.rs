use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Component for the pose of an entity in world space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space [m]
    pub position: Vector3<f64>,

    /// Rotation from body frame to world frame (unit quaternion)
    pub rotation: UnitQuaternion<f64>,

    /// Per-axis scale; read by renderers, never by physics
    pub scale: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new(
        position: Vector3<f64>,
        rotation: UnitQuaternion<f64>,
        scale: Vector3<f64>,
    ) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Identity pose at a specific position.
    pub fn at_position(position: Vector3<f64>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Body +Z expressed in world coordinates; the axis forward thrust
    /// pushes along.
    #[inline]
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }

    #[inline]
    pub fn body_to_world(&self, v: Vector3<f64>) -> Vector3<f64> {
        self.rotation * v
    }

    #[inline]
    pub fn world_to_body(&self, v: Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse() * v
    }

    /// Pull the rotation back onto the unit sphere after composed updates.
    pub fn renormalize(&mut self) {
        self.rotation = UnitQuaternion::new_normalize(self.rotation.into_inner());
    }
}
