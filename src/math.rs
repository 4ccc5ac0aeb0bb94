//! Small shared helpers on top of nalgebra.

use nalgebra::{UnitQuaternion, Vector3};

/// Clamp every component into [-1, 1]; non-finite components become 0.
pub fn clamp_axes(v: Vector3<f64>) -> Vector3<f64> {
    v.map(|c| if c.is_finite() { c.clamp(-1.0, 1.0) } else { 0.0 })
}

#[inline]
pub fn is_finite_vec(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}

#[inline]
pub fn is_finite_quat(q: &UnitQuaternion<f64>) -> bool {
    q.coords.iter().all(|c| c.is_finite())
}

/// Compose an angular step onto an orientation and renormalize.
///
/// `from_scaled_axis(ω·dt)` is the closed form of the quaternion derivative
/// `q̇ = ½·ω_quat·q` for a constant rate over the step.
pub fn integrate_orientation(
    rotation: UnitQuaternion<f64>,
    angular_velocity: Vector3<f64>,
    dt: f64,
) -> UnitQuaternion<f64> {
    let step = UnitQuaternion::from_scaled_axis(angular_velocity * dt);
    UnitQuaternion::new_normalize((step * rotation).into_inner())
}

/// Cap the norm of a vector, preserving direction.
pub fn clamp_norm(v: Vector3<f64>, max: f64) -> Vector3<f64> {
    let norm = v.norm();
    if norm > max {
        v * (max / norm)
    } else {
        v
    }
}
