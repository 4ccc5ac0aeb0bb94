use crate::components::CollisionEvent;
use crate::ecs::component::ComponentMask;
use crate::ecs::entity::EntityId;
use crate::ecs::error::Result;
use crate::ecs::world::{World, WorldParts};
use nalgebra::Vector3;

/// Sphere-sphere overlap test over every pair of collision bodies. Each
/// overlap is registered on both components and queued as one event for the
/// embedder; the core applies no collision response.
pub fn collision_system(world: &mut World, _dt: f64) -> Result<()> {
    let WorldParts {
        entities,
        components,
        elapsed,
        collision_events,
        ..
    } = world.parts_mut();

    let required = ComponentMask::COLLISION | ComponentMask::TRANSFORM;
    let spheres: Vec<(EntityId, Vector3<f64>, f64)> = entities
        .iter()
        .filter(|&entity| entities.mask(entity).contains(required))
        .filter_map(|entity| {
            let transform = components.transforms.get(entity)?;
            let collision = components.collisions.get(entity)?;
            Some((entity, transform.position, collision.radius))
        })
        .collect();

    for (i, &(first, first_center, first_radius)) in spheres.iter().enumerate() {
        for &(second, second_center, second_radius) in &spheres[i + 1..] {
            let delta = second_center - first_center;
            let distance = delta.norm();
            let penetration_depth = first_radius + second_radius - distance;
            if penetration_depth <= 0.0 {
                continue;
            }

            let normal = if distance > 1e-9 {
                delta / distance
            } else {
                Vector3::x()
            };
            let impact_point = first_center + normal * (first_radius - penetration_depth * 0.5);

            if let Some(collision) = components.collisions.get_mut(first) {
                collision.register_collision(elapsed);
            }
            if let Some(collision) = components.collisions.get_mut(second) {
                collision.register_collision(elapsed);
            }
            collision_events.push(CollisionEvent {
                first,
                second,
                impact_point,
                normal,
                penetration_depth,
            });
        }
    }
    Ok(())
}
