use nalgebra::Vector3;
use skiff::{
    ControlAuthority, EntityId, PhysicsComponent, ScriptedFlight, Thruster, Transform, World,
};

/// Spawn a ship with a transform, a validated physics body and a thruster.
/// Drag defaults to 1.0 (no decay) so tests own their damping explicitly.
pub fn spawn_ship(world: &mut World, position: Vector3<f64>, mass: f64) -> EntityId {
    let ship = world.spawn().unwrap();
    world
        .insert_transform(ship, Transform::at_position(position))
        .unwrap();
    world
        .insert_physics(
            ship,
            PhysicsComponent::new(mass, Vector3::new(1.0, 1.0, 1.0)).unwrap(),
        )
        .unwrap();
    world
        .insert_thruster(
            ship,
            Thruster::new(
                Vector3::new(1000.0, 1000.0, 1000.0),
                Vector3::new(100.0, 100.0, 100.0),
            ),
        )
        .unwrap();
    ship
}

/// Ship plus a separate controller entity scripted to fly it.
pub fn spawn_scripted_ship(
    world: &mut World,
    position: Vector3<f64>,
    mass: f64,
) -> (EntityId, EntityId) {
    let ship = spawn_ship(world, position, mass);
    let controller = world.spawn().unwrap();
    world
        .insert_control_authority(ship, ControlAuthority::autopilot(controller))
        .unwrap();
    world
        .insert_scripted_flight(controller, ScriptedFlight::new(ship))
        .unwrap();
    (ship, controller)
}

pub fn assert_body_finite(world: &World, entity: EntityId) {
    let body = world.get_physics(entity).unwrap();
    let transform = world.get_transform(entity).unwrap();
    assert!(
        body.velocity.iter().all(|c| c.is_finite())
            && body.angular_velocity.iter().all(|c| c.is_finite())
            && transform.position.iter().all(|c| c.is_finite())
            && transform.rotation.coords.iter().all(|c| c.is_finite()),
        "non-finite state on entity {entity}"
    );
}
