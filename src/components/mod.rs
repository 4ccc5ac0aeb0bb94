pub mod camera;
pub mod collision;
pub mod control;
pub mod flight;
pub mod physics;
pub mod player;
pub mod render;
pub mod thruster;
pub mod transform;

pub use camera::FlightCamera;
pub use collision::{CollisionComponent, CollisionEvent};
pub use control::{ControlAuthority, ControlMode};
pub use flight::{FlightPath, FlightState, ScriptedFlight, Waypoint, WaypointKind};
pub use physics::{Environment, PhysicsComponent};
pub use player::Player;
pub use render::Renderable;
pub use thruster::Thruster;
pub use transform::Transform;
