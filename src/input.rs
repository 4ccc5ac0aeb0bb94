use serde::{Deserialize, Serialize};

/// Read-only snapshot of normalized control axes, produced once per frame by
/// the input collaborator and held fixed for the duration of a tick. The
/// core never decodes devices; it only sees this.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputState {
    /// Nose up/down, in [-1, 1]
    pub pitch: f64,
    /// Nose left/right, in [-1, 1]
    pub yaw: f64,
    /// Roll left/right, in [-1, 1]
    pub roll: f64,
    /// Forward throttle, in [0, 1]
    pub thrust: f64,
    /// Lateral translation, in [-1, 1]
    pub strafe: f64,
    /// Vertical translation, in [-1, 1]
    pub vertical: f64,
    /// Afterburner, in [0, 1]; policy for it lives outside the core
    pub boost: f64,
    pub brake: bool,
}

impl InputState {
    /// Copy with every axis forced into range; non-finite axes become 0 and
    /// are reported once per snapshot.
    pub fn sanitized(self) -> Self {
        let mut dirty = false;
        let mut axis = |value: f64, min: f64, max: f64| {
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                dirty = true;
                0.0
            }
        };

        let sanitized = Self {
            pitch: axis(self.pitch, -1.0, 1.0),
            yaw: axis(self.yaw, -1.0, 1.0),
            roll: axis(self.roll, -1.0, 1.0),
            thrust: axis(self.thrust, 0.0, 1.0),
            strafe: axis(self.strafe, -1.0, 1.0),
            vertical: axis(self.vertical, -1.0, 1.0),
            boost: axis(self.boost, 0.0, 1.0),
            brake: self.brake,
        };

        if dirty {
            log::warn!("input snapshot contained non-finite axes; zeroed");
        }
        sanitized
    }
}
