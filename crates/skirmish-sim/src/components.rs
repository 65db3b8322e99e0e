//! ECS components for harness craft entities.
//!
//! Components are plain data; behavior lives in the systems modules.

use serde::{Deserialize, Serialize};

/// Identity of a craft in the match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Craft {
    pub name: String,
    pub team: String,
}

/// Structural state the physics layer owns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Airframe {
    /// Bounding radius (meters).
    pub radius: f64,
    pub part_count: u32,
    pub health: f64,
}

/// Pilot orders. A craft with a ram target steers into it at full speed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pilot {
    pub ram_target: Option<String>,
}

impl Pilot {
    pub fn intends_to_ram(&self) -> bool {
        self.ram_target.is_some()
    }
}
