mod common;

use approx::assert_relative_eq;
use common::{assert_body_finite, spawn_ship, spawn_scripted_ship};
use nalgebra::{UnitQuaternion, Vector3};
use skiff::systems::{physics_system, thruster_system};
use skiff::{
    ComponentKind, FlightPath, InputState, Scheduler, SystemKind, Waypoint, World,
};

const DT: f64 = 1.0 / 60.0;

#[test]
fn test_pure_linear_thrust() {
    let mut world = World::new();
    let ship = spawn_ship(&mut world, Vector3::zeros(), 100.0);
    world
        .get_thruster_mut(ship)
        .unwrap()
        .set_linear_command(Vector3::new(1.0, 0.0, 0.0));

    thruster_system(&mut world, 0.016).unwrap();
    physics_system(&mut world, 0.016).unwrap();

    // a = 1000/100 = 10 m/s²; v = 0.16 m/s; x = v·dt = 0.00256 m.
    let body = world.get_physics(ship).unwrap();
    assert!(body.velocity.x > 0.159 && body.velocity.x < 0.161);
    let position = world.get_transform(ship).unwrap().position;
    assert!(position.x > 0.00254 && position.x < 0.00258);
}

#[test]
fn test_drag_decay() {
    let mut world = World::new();
    let ship = spawn_ship(&mut world, Vector3::zeros(), 1.0);
    {
        let body = world.get_physics_mut(ship).unwrap();
        body.velocity = Vector3::new(10.0, 0.0, 0.0);
        body.drag_linear = 0.99;
    }
    world.get_thruster_mut(ship).unwrap().enabled = false;

    for _ in 0..100 {
        physics_system(&mut world, 0.016).unwrap();
        assert!(world.get_physics(ship).unwrap().velocity.x > 0.0);
    }

    let final_velocity = world.get_physics(ship).unwrap().velocity.x;
    assert_relative_eq!(final_velocity, 10.0 * 0.99_f64.powi(100), epsilon = 1e-9);
    assert_relative_eq!(final_velocity, 3.66, epsilon = 0.01);
}

#[test]
fn test_off_center_thrust_produces_torque() {
    let mut world = World::new();
    let ship = spawn_ship(&mut world, Vector3::zeros(), 1.0);
    world.get_thruster_mut(ship).unwrap().enabled = false;

    {
        let body = world.get_physics_mut(ship).unwrap();
        body.add_force_at_point(
            Vector3::new(0.0, 10.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::zeros(),
        );
        assert_relative_eq!(body.torque_accumulator.z, 10.0);
    }

    physics_system(&mut world, 0.016).unwrap();

    let body = world.get_physics(ship).unwrap();
    // +y force advances linear velocity, the (0,0,10) torque spins z.
    assert_relative_eq!(body.velocity.y, 0.16, epsilon = 1e-9);
    assert_relative_eq!(body.angular_velocity.z, 0.16, epsilon = 1e-9);
    assert_eq!(body.force_accumulator, Vector3::zeros());
    assert_eq!(body.torque_accumulator, Vector3::zeros());
}

#[test]
fn test_flight_assist_counter_rotation_through_scheduler() {
    let mut world = World::new();
    let ship = spawn_ship(&mut world, Vector3::zeros(), 1.0);
    world
        .insert_control_authority(ship, skiff::ControlAuthority::player(ship))
        .unwrap();
    world.set_player_entity(ship);
    world.get_physics_mut(ship).unwrap().angular_velocity = Vector3::new(2.0, 0.0, 0.0);
    world.set_input_state(InputState::default());

    let mut scheduler = Scheduler::with_core_systems(&world);
    scheduler.tick(&mut world, DT);

    let command = world.get_thruster(ship).unwrap().current_angular_thrust;
    assert!(command.x < 0.0, "assist must counter the spin, got {command:?}");
    assert!(command.x >= -1.0);
}

#[test]
fn test_scripted_flight_follows_circuit() {
    let mut world = World::new();
    let (ship, controller) = spawn_scripted_ship(&mut world, Vector3::zeros(), 10.0);
    if let Some(facing_x) = UnitQuaternion::rotation_between(&Vector3::z(), &Vector3::x()) {
        world.get_transform_mut(ship).unwrap().rotation = facing_x;
    }
    let path = FlightPath::new(
        vec![
            Waypoint::new(Vector3::new(10.0, 0.0, 0.0), 5.0, 1.0),
            Waypoint::new(Vector3::new(0.0, 0.0, 10.0), 5.0, 1.0),
            Waypoint::new(Vector3::new(-10.0, 0.0, 0.0), 5.0, 1.0),
            Waypoint::new(Vector3::new(0.0, 0.0, -10.0), 5.0, 1.0),
        ],
        true,
    )
    .unwrap();
    world.get_scripted_flight_mut(controller).unwrap().start(path);

    let mut scheduler = Scheduler::with_core_systems(&world);
    let mut reached_last_leg = false;
    let mut wrapped = false;

    // At most 60 simulated seconds.
    for _ in 0..3600 {
        scheduler.tick(&mut world, DT);
        assert_body_finite(&world, ship);

        let waypoint = world
            .get_scripted_flight(controller)
            .unwrap()
            .current_waypoint;
        if waypoint == 3 {
            reached_last_leg = true;
        }
        if reached_last_leg && waypoint == 0 {
            wrapped = true;
            break;
        }
    }

    assert!(reached_last_leg, "never reached the final waypoint");
    assert!(wrapped, "loop did not wrap back to waypoint 0");
}

#[test]
fn test_command_integrates_in_same_tick() {
    let mut world = World::new();
    let (ship, controller) = spawn_scripted_ship(&mut world, Vector3::zeros(), 10.0);
    let path = FlightPath::new(
        vec![Waypoint::new(Vector3::new(1000.0, 0.0, 0.0), 5.0, 1.0)],
        true,
    )
    .unwrap();
    world.get_scripted_flight_mut(controller).unwrap().start(path);

    let mut scheduler = Scheduler::with_core_systems(&world);
    scheduler.tick(&mut world, DT);

    // Scripted flight wrote the command, control shaped it, thrusters turned
    // it into force, physics integrated it — all inside the one tick.
    let velocity = world.get_physics(ship).unwrap().velocity;
    assert!(velocity.x > 0.0, "command did not reach velocity this frame");

    // And the published snapshot already reflects the integrated pose.
    let snapshot = world.render_snapshot();
    assert!(snapshot.iter().any(|sample| sample.entity == ship));
}

#[test]
fn test_scheduler_frequency_contract() {
    let mut world = World::new();
    spawn_ship(&mut world, Vector3::zeros(), 1.0);

    let mut scheduler = Scheduler::with_core_systems(&world);
    for _ in 0..300 {
        scheduler.tick(&mut world, DT);
    }

    // 5 s: physics at 60 Hz, collision at 20 Hz, within ±1.
    let physics = scheduler.fire_count(SystemKind::Physics) as i64;
    let collision = scheduler.fire_count(SystemKind::Collision) as i64;
    assert!((physics - 300).abs() <= 1, "physics fired {physics}");
    assert!((collision - 100).abs() <= 1, "collision fired {collision}");
}

#[test]
fn test_disabled_thruster_leaves_body_at_rest() {
    let mut world = World::new();
    let ship = spawn_ship(&mut world, Vector3::zeros(), 1.0);
    {
        let thruster = world.get_thruster_mut(ship).unwrap();
        thruster.set_linear_command(Vector3::new(1.0, 1.0, 1.0));
        thruster.set_angular_command(Vector3::new(1.0, 0.0, 0.0));
        thruster.enabled = false;
    }

    let mut scheduler = Scheduler::with_core_systems(&world);
    for _ in 0..60 {
        scheduler.tick(&mut world, DT);
    }

    let body = world.get_physics(ship).unwrap();
    assert_eq!(body.velocity, Vector3::zeros());
    assert_eq!(body.angular_velocity, Vector3::zeros());
}

#[test]
fn test_stale_ids_fail_after_reuse() {
    let mut world = World::new();
    let ship = spawn_ship(&mut world, Vector3::zeros(), 1.0);

    assert!(world.despawn(ship));
    let replacement = world.spawn().unwrap();
    assert_eq!(ship.index(), replacement.index());
    assert_ne!(ship, replacement);

    assert!(!world.is_alive(ship));
    assert!(world.get_transform(ship).is_err());
    assert!(!world.despawn(ship));
    assert!(!world.has_component(ship, ComponentKind::Thruster));
}

#[test]
fn test_simulation_survives_hostile_input() {
    let mut world = World::new();
    let ship = spawn_ship(&mut world, Vector3::zeros(), 1.0);
    world
        .insert_control_authority(ship, skiff::ControlAuthority::player(ship))
        .unwrap();
    world.set_player_entity(ship);
    world.set_input_state(InputState {
        pitch: f64::NAN,
        thrust: f64::INFINITY,
        strafe: -55.0,
        ..Default::default()
    });

    let mut scheduler = Scheduler::with_core_systems(&world);
    for _ in 0..120 {
        scheduler.tick(&mut world, DT);
        assert_body_finite(&world, ship);
    }
}
