//! Events emitted by the adjudicator for status and telemetry collaborators.

use serde::{Deserialize, Serialize};

use crate::enums::{AliveState, DamageFrom, GmKillReason};

/// Match events, drained by the driver after each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchEvent {
    /// A pair was flagged as geometrically close enough to collide.
    PotentialCollision { a: String, b: String },
    /// A physics contact was matched to a flagged pair.
    CollisionConfirmed { a: String, b: String },
    /// A settled collision was attributed.
    RamAttributed {
        rammer: String,
        rammed: String,
        parts_lost: u32,
        head_on: bool,
    },
    /// A combatant died; classification already applied.
    CombatantDied {
        victim: String,
        classification: AliveState,
        killer: Option<String>,
        killed_by: DamageFrom,
        gm_reason: GmKillReason,
    },
    /// A combatant left the tracked set mid-match.
    CombatantLeft { id: String },
    /// A physics contact could not be matched to any ledger combatant.
    ContactUnresolved { reported_name: String },
}
