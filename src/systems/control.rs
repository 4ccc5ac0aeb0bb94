use crate::components::control::{ControlMode, ASSIST_DEADZONE};
use crate::ecs::component::ComponentMask;
use crate::ecs::error::Result;
use crate::ecs::world::{World, WorldParts};
use crate::math::clamp_axes;
use nalgebra::Vector3;

/// Translate each control authority's commanded input into thruster
/// commands. The player entity samples the input snapshot; autopilot and
/// foreign-agent authorities keep whatever their commanding agent wrote
/// earlier in the tick. Dormant authorities are skipped outright so their
/// thruster commands are never cleared.
pub fn control_system(world: &mut World, _dt: f64) -> Result<()> {
    let WorldParts {
        entities,
        components,
        input,
        player_entity,
        ..
    } = world.parts_mut();

    let required = ComponentMask::CONTROL_AUTHORITY | ComponentMask::THRUSTER;
    for entity in entities.iter() {
        if !entities.mask(entity).contains(required) {
            continue;
        }
        let Some(authority) = components.control.get_mut(entity) else {
            continue;
        };
        if authority.controlled_by.is_invalid() {
            continue;
        }

        let foreign_agent =
            authority.mode == ControlMode::Autopilot || authority.controlled_by != entity;
        if !foreign_agent && entity == player_entity {
            let brake = if input.brake { 1.0 } else { 0.0 };
            authority.input_linear =
                Vector3::new(input.strafe, input.vertical, input.thrust - brake);
            authority.input_angular = Vector3::new(input.pitch, input.yaw, input.roll);
        }

        let raw_angular = authority.input_angular;
        let linear = sensitivity_curve(authority.input_linear, authority.sensitivity());
        let mut angular = sensitivity_curve(raw_angular, authority.sensitivity());

        if authority.flight_assist_enabled && authority.mode == ControlMode::Assisted {
            if let Some(body) = components.physics.get(entity) {
                for axis in 0..3 {
                    if raw_angular[axis].abs() < ASSIST_DEADZONE {
                        angular[axis] = (angular[axis]
                            - authority.flight_assist_strength * body.angular_velocity[axis])
                            .clamp(-1.0, 1.0);
                    }
                }
            }
        }

        let Some(thruster) = components.thrusters.get_mut(entity) else {
            continue;
        };
        thruster.set_linear_command(linear);
        thruster.set_angular_command(angular);
    }
    Ok(())
}

/// Quadratic response: fine near center, aggressive at the edges.
fn sensitivity_curve(input: Vector3<f64>, sensitivity: f64) -> Vector3<f64> {
    clamp_axes(input.map(|x| x.signum() * x * x * sensitivity))
}
