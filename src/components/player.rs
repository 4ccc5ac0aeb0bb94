use serde::{Deserialize, Serialize};

/// Marker component for the human-flown ship.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player;
