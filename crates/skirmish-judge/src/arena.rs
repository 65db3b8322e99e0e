//! Per-tick view of the external world.
//!
//! The host simulation owns positions, velocities, and structure; the
//! adjudicator only ever sees these read-only snapshots. Liveness is an
//! explicit lookup (`state()` returning `Option`), never an exception path:
//! a combatant missing from the snapshot is destroyed or despawned.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use skirmish_core::types::{Position, Velocity};

/// One combatant's externally-owned state at a tick boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantState {
    pub id: String,
    pub team: String,
    pub position: Position,
    pub velocity: Velocity,
    /// Bounding radius of the craft (meters).
    pub radius: f64,
    /// Number of structural parts still attached.
    pub part_count: u32,
    /// Remaining hitpoints as computed by the host.
    pub health: f64,
    /// Whether the craft's controller currently intends to ram.
    pub ram_intent: bool,
}

/// Snapshot of every living combatant, supplied by the tick driver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    /// Seconds since simulation start.
    pub time: f64,
    combatants: HashMap<String, CombatantState>,
}

impl ArenaSnapshot {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            combatants: HashMap::new(),
        }
    }

    pub fn push(&mut self, state: CombatantState) {
        self.combatants.insert(state.id.clone(), state);
    }

    /// Explicit liveness query: `None` means destroyed or never tracked.
    pub fn state(&self, id: &str) -> Option<&CombatantState> {
        self.combatants.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.combatants.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.combatants.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatantState> {
        self.combatants.values()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}
