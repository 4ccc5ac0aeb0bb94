use crate::ecs::component::ComponentMask;
use crate::ecs::error::Result;
use crate::ecs::world::{World, WorldParts};

/// Move each camera entity toward its target's pose composed with the
/// body-frame offset, closing a fixed fraction of the error per update.
pub fn camera_system(world: &mut World, _dt: f64) -> Result<()> {
    let WorldParts {
        entities,
        components,
        ..
    } = world.parts_mut();

    let required = ComponentMask::CAMERA | ComponentMask::TRANSFORM;
    for entity in entities.iter() {
        if !entities.mask(entity).contains(required) {
            continue;
        }
        let Some(camera) = components.cameras.get(entity) else {
            continue;
        };
        let factor = camera.interpolation_factor.clamp(0.0, 1.0);
        let offset = camera.offset;
        let Some(target_pose) = components.transforms.get(camera.target).copied() else {
            continue;
        };
        let Some(camera_transform) = components.transforms.get_mut(entity) else {
            continue;
        };

        let desired = target_pose.position + target_pose.rotation * offset;
        camera_transform.position += (desired - camera_transform.position) * factor;
        camera_transform.rotation = camera_transform
            .rotation
            .try_slerp(&target_pose.rotation, factor, 1.0e-9)
            .unwrap_or(target_pose.rotation);
        camera_transform.renormalize();
    }
    Ok(())
}
