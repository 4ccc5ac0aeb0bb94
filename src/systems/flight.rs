use crate::components::{Waypoint, WaypointKind};
use crate::ecs::component::ComponentMask;
use crate::ecs::error::Result;
use crate::ecs::world::{World, WorldParts};
use crate::math::clamp_axes;
use nalgebra::{UnitQuaternion, Vector3};

/// Proportional gain from normalized velocity error to linear command.
const LINEAR_GAIN: f64 = 1.0;

/// Proportional gain from rotation error (axis-angle, rad) to angular
/// command.
const ANGULAR_GAIN: f64 = 2.0;

/// Drive each active scripted flight's target ship along its path: advance
/// waypoints inside tolerance, then write a proportional velocity command
/// and a steering command into the target's control authority. The control
/// system shapes and forwards them later in the same tick.
pub fn scripted_flight_system(world: &mut World, _dt: f64) -> Result<()> {
    let WorldParts {
        entities,
        components,
        ..
    } = world.parts_mut();

    for entity in entities.iter() {
        if !entities
            .mask(entity)
            .contains(ComponentMask::SCRIPTED_FLIGHT)
        {
            continue;
        }
        let Some(flight) = components.scripted.get_mut(entity) else {
            continue;
        };
        if !flight.is_active() {
            continue;
        }
        let Some(path) = flight.path().cloned() else {
            continue;
        };

        let target = flight.target;
        let Some(transform) = components.transforms.get(target).copied() else {
            continue;
        };
        let Some(velocity) = components.physics.get(target).map(|body| body.velocity) else {
            continue;
        };
        flight.current_speed = velocity.norm();

        let Some(waypoint) = path.waypoint(flight.current_waypoint) else {
            flight.complete();
            continue;
        };

        if (waypoint.position - transform.position).norm() < waypoint.tolerance {
            flight.current_waypoint += 1;
            if flight.current_waypoint >= path.len() {
                if path.is_looped() {
                    flight.current_waypoint = 0;
                } else {
                    flight.complete();
                    continue;
                }
            }
        }

        // Manual override suspends command writes; tracking above still ran,
        // so a human can hand back control without the path snapping back.
        if flight.manual_override {
            continue;
        }

        let Some(waypoint) = path.waypoint(flight.current_waypoint) else {
            continue;
        };
        let to_waypoint = waypoint.position - transform.position;
        let distance = to_waypoint.norm();
        if distance <= f64::EPSILON {
            continue;
        }
        let direction = to_waypoint / distance;

        let desired_velocity = direction * desired_speed(waypoint, distance);
        let velocity_error = desired_velocity - velocity;
        let linear = clamp_axes(
            transform.world_to_body(velocity_error) * LINEAR_GAIN
                / waypoint.target_speed.max(f64::EPSILON),
        );
        let angular = steer_toward(&transform.rotation, transform.forward(), direction);

        let Some(authority) = components.control.get_mut(target) else {
            continue;
        };
        authority.input_linear = linear;
        authority.input_angular = angular;
    }
    Ok(())
}

/// Desired closing speed; approach and rendezvous waypoints taper it down
/// as the ship closes in, rendezvous all the way to rest.
fn desired_speed(waypoint: &Waypoint, distance: f64) -> f64 {
    match waypoint.kind {
        WaypointKind::Position => waypoint.target_speed,
        WaypointKind::Approach => {
            waypoint.target_speed * (distance / (5.0 * waypoint.tolerance)).clamp(0.2, 1.0)
        }
        WaypointKind::Rendezvous => {
            waypoint.target_speed * (distance / (10.0 * waypoint.tolerance)).clamp(0.0, 1.0)
        }
    }
}

/// Angular command turning the body forward axis onto `direction`:
/// proportional on the rotation error as a body-frame axis-angle vector.
fn steer_toward(
    rotation: &UnitQuaternion<f64>,
    forward: Vector3<f64>,
    direction: Vector3<f64>,
) -> Vector3<f64> {
    let error_world = match UnitQuaternion::rotation_between(&forward, &direction) {
        Some(error) => error.scaled_axis(),
        // Antiparallel: any perpendicular axis gives a full turn-around.
        None => perpendicular_to(forward) * std::f64::consts::PI,
    };
    clamp_axes(rotation.inverse() * error_world * ANGULAR_GAIN)
}

fn perpendicular_to(v: Vector3<f64>) -> Vector3<f64> {
    let candidate = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&candidate).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{
        ControlAuthority, FlightPath, FlightState, PhysicsComponent, ScriptedFlight, Thruster,
        Transform,
    };
    use crate::ecs::entity::EntityId;
    use approx::assert_relative_eq;

    fn spawn_drone(world: &mut World) -> (EntityId, EntityId) {
        let ship = world.spawn().unwrap();
        world.insert_transform(ship, Transform::default()).unwrap();
        world
            .insert_physics(ship, PhysicsComponent::default())
            .unwrap();
        world.insert_thruster(ship, Thruster::default()).unwrap();

        let controller = world.spawn().unwrap();
        world
            .insert_control_authority(ship, ControlAuthority::autopilot(controller))
            .unwrap();
        world
            .insert_scripted_flight(controller, ScriptedFlight::new(ship))
            .unwrap();
        (ship, controller)
    }

    #[test]
    fn test_commands_point_at_waypoint() {
        let mut world = World::new();
        let (ship, controller) = spawn_drone(&mut world);
        let path = FlightPath::new(
            vec![Waypoint::new(Vector3::new(100.0, 0.0, 0.0), 5.0, 1.0)],
            true,
        )
        .unwrap();
        world
            .get_scripted_flight_mut(controller)
            .unwrap()
            .start(path);

        scripted_flight_system(&mut world, 1.0 / 60.0).unwrap();

        let authority = world.get_control_authority(ship).unwrap();
        // Waypoint is along world +X; with identity rotation the body-frame
        // command points the same way, saturated by the full velocity error.
        assert_relative_eq!(authority.input_linear.x, 1.0);
        // Steering pulls body +Z toward +X: a positive yaw command.
        assert!(authority.input_angular.y > 0.0);
    }

    #[test]
    fn test_waypoint_advance_and_loop_wrap() {
        let mut world = World::new();
        let (ship, controller) = spawn_drone(&mut world);
        let path = FlightPath::new(
            vec![
                Waypoint::new(Vector3::new(0.5, 0.0, 0.0), 5.0, 1.0),
                Waypoint::new(Vector3::new(100.0, 0.0, 0.0), 5.0, 1.0),
            ],
            true,
        )
        .unwrap();
        world
            .get_scripted_flight_mut(controller)
            .unwrap()
            .start(path);

        // Ship starts inside the first waypoint's tolerance.
        scripted_flight_system(&mut world, 1.0 / 60.0).unwrap();
        assert_eq!(
            world.get_scripted_flight(controller).unwrap().current_waypoint,
            1
        );

        // Teleport inside the second: wraps to 0, stays running.
        world.get_transform_mut(ship).unwrap().position = Vector3::new(100.0, 0.0, 0.0);
        scripted_flight_system(&mut world, 1.0 / 60.0).unwrap();
        let flight = world.get_scripted_flight(controller).unwrap();
        assert_eq!(flight.current_waypoint, 0);
        assert_eq!(flight.state(), FlightState::Running);
    }

    #[test]
    fn test_open_path_completes() {
        let mut world = World::new();
        let (_ship, controller) = spawn_drone(&mut world);
        let path = FlightPath::new(
            vec![Waypoint::new(Vector3::new(0.5, 0.0, 0.0), 5.0, 1.0)],
            false,
        )
        .unwrap();
        world
            .get_scripted_flight_mut(controller)
            .unwrap()
            .start(path);

        scripted_flight_system(&mut world, 1.0 / 60.0).unwrap();
        assert_eq!(
            world.get_scripted_flight(controller).unwrap().state(),
            FlightState::Completed
        );
    }

    #[test]
    fn test_manual_override_leaves_commands_untouched() {
        let mut world = World::new();
        let (ship, controller) = spawn_drone(&mut world);
        let path = FlightPath::new(
            vec![Waypoint::new(Vector3::new(100.0, 0.0, 0.0), 5.0, 1.0)],
            true,
        )
        .unwrap();
        {
            let flight = world.get_scripted_flight_mut(controller).unwrap();
            flight.start(path);
            flight.pause();
        }
        world.get_control_authority_mut(ship).unwrap().input_linear =
            Vector3::new(0.0, 0.0, 0.5);

        scripted_flight_system(&mut world, 1.0 / 60.0).unwrap();

        let authority = world.get_control_authority(ship).unwrap();
        assert_relative_eq!(authority.input_linear.z, 0.5);
        assert_relative_eq!(authority.input_linear.x, 0.0);
    }

    #[test]
    fn test_rendezvous_tapers_to_rest() {
        let near = Waypoint::new(Vector3::zeros(), 10.0, 1.0).with_kind(WaypointKind::Rendezvous);
        assert!(desired_speed(&near, 2.0) < desired_speed(&near, 20.0));
        assert_relative_eq!(desired_speed(&near, 0.0), 0.0);

        let position = Waypoint::new(Vector3::zeros(), 10.0, 1.0);
        assert_relative_eq!(desired_speed(&position, 0.5), 10.0);
    }

    #[test]
    fn test_steer_toward_is_zero_when_aligned() {
        let rotation = UnitQuaternion::identity();
        let command = steer_toward(&rotation, Vector3::z(), Vector3::z());
        assert_relative_eq!(command.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_steer_toward_handles_antiparallel() {
        let rotation = UnitQuaternion::identity();
        let command = steer_toward(&rotation, Vector3::z(), -Vector3::z());
        assert!(command.norm() > 0.0);
        assert!(command.iter().all(|c| c.is_finite()));
    }
}
