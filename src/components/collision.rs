use crate::ecs::entity::EntityId;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Raised when two collision spheres overlap during a collision tick.
#[derive(Debug, Clone)]
pub struct CollisionEvent {
    pub first: EntityId,
    pub second: EntityId,
    /// Midpoint of the overlap in world space
    pub impact_point: Vector3<f64>,
    /// Unit normal pointing from `first` toward `second`
    pub normal: Vector3<f64>,
    /// Overlap depth [m]
    pub penetration_depth: f64,
}

/// Component for sphere collision checks and per-entity bookkeeping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CollisionComponent {
    /// Radius of the collision sphere [m]
    pub radius: f64,

    /// Whether the entity collided on the most recent collision tick
    #[serde(skip)]
    pub has_collided: bool,

    /// Collisions registered since the last reset
    #[serde(skip)]
    pub collision_count: u32,

    /// Simulation time of the last collision [s]
    #[serde(skip)]
    pub last_collision_time: f64,
}

impl Default for CollisionComponent {
    fn default() -> Self {
        Self {
            radius: 5.0,
            has_collided: false,
            collision_count: 0,
            last_collision_time: 0.0,
        }
    }
}

impl CollisionComponent {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            ..Default::default()
        }
    }

    pub fn reset(&mut self) {
        self.has_collided = false;
        self.collision_count = 0;
        self.last_collision_time = 0.0;
    }

    pub fn register_collision(&mut self, time: f64) {
        self.has_collided = true;
        self.collision_count += 1;
        self.last_collision_time = time;
    }

    pub fn has_recent_collision(&self, current_time: f64, window: f64) -> bool {
        self.has_collided && (current_time - self.last_collision_time) < window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_recent() {
        let mut collision = CollisionComponent::new(2.0);
        assert!(!collision.has_recent_collision(10.0, 1.0));

        collision.register_collision(10.0);
        assert!(collision.has_collided);
        assert_eq!(collision.collision_count, 1);
        assert!(collision.has_recent_collision(10.5, 1.0));
        assert!(!collision.has_recent_collision(11.5, 1.0));

        collision.reset();
        assert!(!collision.has_collided);
        assert_eq!(collision.collision_count, 0);
    }
}
