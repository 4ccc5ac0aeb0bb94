use crate::ecs::component::ComponentMask;
use crate::ecs::error::Result;
use crate::ecs::world::{World, WorldParts};
use crate::math::clamp_axes;

/// Turn each enabled thruster's normalized body-frame command into
/// world-frame force and torque on its physics body. Pure transducer: no
/// policy lives here, only the frame change and the capability caps.
pub fn thruster_system(world: &mut World, _dt: f64) -> Result<()> {
    let WorldParts {
        entities,
        components,
        ..
    } = world.parts_mut();

    let required = ComponentMask::THRUSTER | ComponentMask::PHYSICS | ComponentMask::TRANSFORM;
    for entity in entities.iter() {
        if !entities.mask(entity).contains(required) {
            continue;
        }
        let Some(thruster) = components.thrusters.get(entity) else {
            continue;
        };
        if !thruster.enabled {
            continue;
        }
        let Some(transform) = components.transforms.get(entity) else {
            continue;
        };
        let Some(body) = components.physics.get_mut(entity) else {
            continue;
        };

        let force_body = clamp_axes(thruster.current_linear_thrust)
            .component_mul(&thruster.max_linear_force);
        let force_world =
            transform.rotation * force_body * thruster.efficiency(body.environment);
        body.add_force(force_world);

        if body.has_6dof {
            let torque_body = clamp_axes(thruster.current_angular_thrust)
                .component_mul(&thruster.max_angular_torque);
            body.add_torque(transform.rotation * torque_body);
        }
    }
    Ok(())
}
