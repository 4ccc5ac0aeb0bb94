pub mod camera;
pub mod collision;
pub mod control;
pub mod flight;
pub mod physics;
pub mod thrusters;

pub use camera::camera_system;
pub use collision::collision_system;
pub use control::control_system;
pub use flight::scripted_flight_system;
pub use physics::physics_system;
pub use thrusters::thruster_system;
