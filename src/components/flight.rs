use crate::ecs::entity::{EntityId, INVALID_ENTITY};
use crate::ecs::error::{EcsError, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::sync::Arc;

/// How a waypoint wants to be flown through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaypointKind {
    /// Hold target speed through the waypoint
    Position,
    /// Taper speed while closing in
    Approach,
    /// Arrive at rest
    Rendezvous,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Waypoint {
    /// Target position in world space [m]
    pub position: Vector3<f64>,

    /// Desired speed toward the waypoint [m/s]
    pub target_speed: f64,

    /// Radius within which the waypoint counts as reached [m]
    pub tolerance: f64,

    pub kind: WaypointKind,
}

impl Waypoint {
    pub fn new(position: Vector3<f64>, target_speed: f64, tolerance: f64) -> Self {
        Self {
            position,
            target_speed,
            tolerance,
            kind: WaypointKind::Position,
        }
    }

    pub fn with_kind(mut self, kind: WaypointKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Immutable ordered waypoint sequence. Paths are built once, shared via
/// `Arc`, and outlive every controller referencing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightPath {
    waypoints: Vec<Waypoint>,
    looped: bool,
    total_distance: f64,
}

impl FlightPath {
    pub fn new(waypoints: Vec<Waypoint>, looped: bool) -> Result<Arc<Self>> {
        if waypoints.is_empty() {
            return Err(EcsError::Domain("flight path needs at least one waypoint".into()));
        }
        for (index, waypoint) in waypoints.iter().enumerate() {
            if !waypoint.target_speed.is_finite() || waypoint.target_speed <= 0.0 {
                return Err(EcsError::Domain(format!(
                    "waypoint {index} target speed must be positive, got {}",
                    waypoint.target_speed
                )));
            }
            if !waypoint.tolerance.is_finite() || waypoint.tolerance <= 0.0 {
                return Err(EcsError::Domain(format!(
                    "waypoint {index} tolerance must be positive, got {}",
                    waypoint.tolerance
                )));
            }
        }

        let total_distance = Self::path_length(&waypoints, looped);
        Ok(Arc::new(Self {
            waypoints,
            looped,
            total_distance,
        }))
    }

    /// Closed circular patrol around `center` in the XZ plane.
    pub fn circuit(
        center: Vector3<f64>,
        radius: f64,
        waypoint_count: usize,
        target_speed: f64,
        tolerance: f64,
    ) -> Result<Arc<Self>> {
        if !radius.is_finite() || radius <= 0.0 || waypoint_count < 2 {
            return Err(EcsError::Domain(format!(
                "circuit needs a positive radius and at least two waypoints, got radius {radius}, count {waypoint_count}"
            )));
        }

        let waypoints = (0..waypoint_count)
            .map(|i| {
                let angle = TAU * i as f64 / waypoint_count as f64;
                let position =
                    center + Vector3::new(radius * angle.cos(), 0.0, radius * angle.sin());
                Waypoint::new(position, target_speed, tolerance)
            })
            .collect();
        Self::new(waypoints, true)
    }

    /// Closed figure-eight (Gerono lemniscate) around `center` in the XZ
    /// plane; the crossover sits at the center.
    pub fn figure_eight(
        center: Vector3<f64>,
        lobe_radius: f64,
        waypoint_count: usize,
        target_speed: f64,
        tolerance: f64,
    ) -> Result<Arc<Self>> {
        if !lobe_radius.is_finite() || lobe_radius <= 0.0 || waypoint_count < 4 {
            return Err(EcsError::Domain(format!(
                "figure eight needs a positive lobe radius and at least four waypoints, got radius {lobe_radius}, count {waypoint_count}"
            )));
        }

        let waypoints = (0..waypoint_count)
            .map(|i| {
                let t = TAU * i as f64 / waypoint_count as f64;
                let position = center
                    + Vector3::new(
                        lobe_radius * t.sin(),
                        0.0,
                        lobe_radius * t.sin() * t.cos(),
                    );
                Waypoint::new(position, target_speed, tolerance)
            })
            .collect();
        Self::new(waypoints, true)
    }

    /// Open descent from `start` to `touchdown`: intermediate approach
    /// waypoints with tapering speed, ending in a rendezvous at the pad.
    pub fn landing_approach(
        start: Vector3<f64>,
        touchdown: Vector3<f64>,
        approach_speed: f64,
        tolerance: f64,
    ) -> Result<Arc<Self>> {
        const LEGS: usize = 4;

        let mut waypoints = Vec::with_capacity(LEGS);
        for i in 1..=LEGS {
            let fraction = i as f64 / LEGS as f64;
            let position = start + (touchdown - start) * fraction;
            let speed = (approach_speed * (1.0 - 0.75 * fraction)).max(approach_speed * 0.25);
            let kind = if i == LEGS {
                WaypointKind::Rendezvous
            } else {
                WaypointKind::Approach
            };
            waypoints.push(Waypoint::new(position, speed, tolerance).with_kind(kind));
        }
        Self::new(waypoints, false)
    }

    #[inline]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    #[inline]
    pub fn waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    #[inline]
    pub fn is_looped(&self) -> bool {
        self.looped
    }

    /// Sum of leg lengths, including the closing leg for looped paths [m].
    #[inline]
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    fn path_length(waypoints: &[Waypoint], looped: bool) -> f64 {
        let mut distance: f64 = waypoints
            .windows(2)
            .map(|pair| (pair[1].position - pair[0].position).norm())
            .sum();
        if looped && waypoints.len() > 1 {
            if let (Some(first), Some(last)) = (waypoints.first(), waypoints.last()) {
                distance += (first.position - last.position).norm();
            }
        }
        distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Component for an agent entity supervising a target ship along a flight
/// path. The target owns the `ControlAuthority` this controller writes to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedFlight {
    /// The ship being flown
    pub target: EntityId,

    /// Not serialized: paths are rebuilt by the scene loader and re-attached
    /// through `start`.
    #[serde(skip)]
    path: Option<Arc<FlightPath>>,

    pub current_waypoint: usize,

    state: FlightState,

    /// Suspends command writes while a human flies; waypoint tracking
    /// continues so resume picks up where the ship actually is.
    pub manual_override: bool,

    /// Actual speed of the target, tracked each update [m/s]
    pub current_speed: f64,
}

impl ScriptedFlight {
    pub fn new(target: EntityId) -> Self {
        Self {
            target,
            path: None,
            current_waypoint: 0,
            state: FlightState::Idle,
            manual_override: false,
            current_speed: 0.0,
        }
    }

    pub fn start(&mut self, path: Arc<FlightPath>) {
        self.path = Some(path);
        self.current_waypoint = 0;
        self.manual_override = false;
        self.state = FlightState::Running;
    }

    pub fn pause(&mut self) {
        if self.state == FlightState::Running {
            self.state = FlightState::Paused;
            self.manual_override = true;
        }
    }

    pub fn resume(&mut self) {
        if self.state == FlightState::Paused {
            self.state = FlightState::Running;
            self.manual_override = false;
        }
    }

    pub(crate) fn complete(&mut self) {
        self.state = FlightState::Completed;
    }

    #[inline]
    pub fn state(&self) -> FlightState {
        self.state
    }

    #[inline]
    pub fn path(&self) -> Option<&Arc<FlightPath>> {
        self.path.as_ref()
    }

    /// Running or paused; a paused flight still tracks waypoints.
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.state, FlightState::Running | FlightState::Paused)
    }
}

impl Default for ScriptedFlight {
    fn default() -> Self {
        Self::new(INVALID_ENTITY)
    }
}
