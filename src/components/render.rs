use serde::{Deserialize, Serialize};

/// Component carrying the data a renderer collaborator needs to draw an
/// entity; the core never reads it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Renderable {
    /// Draw-order layer; higher layers draw later
    pub layer: i32,

    /// RGBA tint, each channel in [0, 1]
    pub tint: [f32; 4],

    pub visible: bool,
}

impl Default for Renderable {
    fn default() -> Self {
        Self {
            layer: 0,
            tint: [1.0, 1.0, 1.0, 1.0],
            visible: true,
        }
    }
}
