//! A 6-DOF space flight simulation kernel: entity/component store,
//! frequency-scheduled system executor, rigid-body integrator, thruster
//! resolver, and the control layer that turns input or scripted paths into
//! thruster commands. Rendering, assets, input devices and scenes are
//! collaborators layered on top of the API surface exported here.

pub mod components;
pub mod config;
pub mod ecs;
pub mod input;
pub mod math;
pub mod systems;

pub use components::{
    CollisionComponent, CollisionEvent, ControlAuthority, ControlMode, Environment, FlightCamera,
    FlightPath, FlightState, PhysicsComponent, Player, Renderable, ScriptedFlight, Thruster,
    Transform, Waypoint, WaypointKind,
};
pub use config::{ConfigError, SimConfig};
pub use ecs::{
    ComponentKind, ComponentMask, EcsError, EntityId, LodPolicy, Scheduler, SystemKind,
    TransformSample, World, INVALID_ENTITY,
};
pub use input::InputState;
