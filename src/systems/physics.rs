use crate::components::{PhysicsComponent, Transform};
use crate::ecs::component::ComponentMask;
use crate::ecs::entity::EntityId;
use crate::ecs::error::Result;
use crate::ecs::world::{World, WorldParts};
use crate::math::{clamp_norm, integrate_orientation, is_finite_quat, is_finite_vec};
use nalgebra::Vector3;

/// Integrate accumulated forces into velocity and velocity into pose for
/// every physics body, then zero the accumulators. Semi-implicit Euler:
/// velocity first, position from the updated velocity.
pub fn physics_system(world: &mut World, dt: f64) -> Result<()> {
    let WorldParts {
        entities,
        components,
        config,
        ..
    } = world.parts_mut();

    let required = ComponentMask::PHYSICS | ComponentMask::TRANSFORM;
    for entity in entities.iter() {
        if !entities.mask(entity).contains(required) {
            continue;
        }
        let Some(body) = components.physics.get_mut(entity) else {
            continue;
        };
        let Some(transform) = components.transforms.get_mut(entity) else {
            continue;
        };

        integrate_body(
            entity,
            body,
            transform,
            dt,
            config.max_linear_velocity,
            config.max_angular_velocity,
        );

        // Accumulators are cleared exactly once per physics tick, for every
        // body, kinematic ones included; forces must not pile up across
        // frames where integration was skipped.
        body.clear_accumulators();
    }
    Ok(())
}

fn integrate_body(
    entity: EntityId,
    body: &mut PhysicsComponent,
    transform: &mut Transform,
    dt: f64,
    max_linear_velocity: f64,
    max_angular_velocity: f64,
) {
    if body.kinematic {
        body.acceleration = Vector3::zeros();
        body.angular_acceleration = Vector3::zeros();
        return;
    }

    let prev_position = transform.position;
    let prev_rotation = transform.rotation;

    if body.mass > 0.0 {
        body.acceleration = body.force_accumulator / body.mass;
        body.velocity += body.acceleration * dt;
    } else {
        // Zero mass disables linear integration rather than dividing by it.
        body.acceleration = Vector3::zeros();
    }
    body.velocity *= body.drag_linear;

    if body.has_6dof {
        body.angular_acceleration = body
            .torque_accumulator
            .component_div(&body.moment_of_inertia);
        body.angular_velocity += body.angular_acceleration * dt;
        body.angular_velocity *= body.drag_angular;
    } else {
        body.angular_acceleration = Vector3::zeros();
        body.angular_velocity = Vector3::zeros();
    }

    body.velocity = clamp_norm(body.velocity, max_linear_velocity);
    body.angular_velocity = clamp_norm(body.angular_velocity, max_angular_velocity);

    transform.position += body.velocity * dt;

    if body.has_6dof && body.angular_velocity.norm_squared() > 0.0 {
        transform.rotation = integrate_orientation(transform.rotation, body.angular_velocity, dt);
    }

    let finite = is_finite_vec(&body.velocity)
        && is_finite_vec(&body.angular_velocity)
        && is_finite_vec(&transform.position)
        && is_finite_quat(&transform.rotation);
    if !finite {
        log::warn!("numeric instability on entity {entity}; body reset to rest at last valid pose");
        transform.position = prev_position;
        transform.rotation = prev_rotation;
        body.velocity = Vector3::zeros();
        body.angular_velocity = Vector3::zeros();
        body.acceleration = Vector3::zeros();
        body.angular_acceleration = Vector3::zeros();
    }
}
