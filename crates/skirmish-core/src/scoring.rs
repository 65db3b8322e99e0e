//! The ledger-store record: one `ScoringData` per combatant.
//!
//! Plain data with no behavior. All mutation goes through the combat ledger,
//! which owns the map of these.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::enums::{AliveState, DamageFrom, GmKillReason};

/// Scoring and attribution state for one combatant.
///
/// Incoming tallies are victim-centric: `hit_counts[attacker]` is how many
/// times `attacker` hit *this* combatant. Outgoing tallies (`shots_fired`,
/// `hits_landed`, …) feed the accuracy line of the result report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringData {
    pub team: String,
    pub alive_state: AliveState,

    // --- Guns ---
    /// Shots this combatant fired.
    pub shots_fired: u32,
    /// Gun hits this combatant landed on others.
    pub hits_landed: u32,
    /// Gun hits taken, per attacker.
    pub hit_counts: HashMap<String, u32>,
    /// Gun damage taken, per attacker.
    pub damage_from_guns: HashMap<String, f64>,

    // --- Rockets ---
    pub rockets_fired: u32,
    /// Rocket strikes this combatant landed on others.
    pub rocket_strikes_landed: u32,
    /// Rocket strikes taken, per attacker.
    pub rocket_strike_counts: HashMap<String, u32>,
    /// Parts damaged by rockets, per attacker.
    pub rocket_part_damage_counts: HashMap<String, u32>,
    /// Rocket damage taken, per attacker.
    pub damage_from_rockets: HashMap<String, f64>,

    // --- Missiles ---
    /// Missile strikes taken, per attacker.
    pub missile_hit_counts: HashMap<String, u32>,
    /// Parts damaged by missiles, per attacker.
    pub missile_part_damage_counts: HashMap<String, u32>,
    /// Missile damage taken, per attacker.
    pub damage_from_missiles: HashMap<String, f64>,

    // --- Ramming ---
    /// Parts lost to rams, per rammer.
    pub ramming_part_loss_counts: HashMap<String, u32>,

    // --- Battle damage ---
    /// Attrition damage computed by the host, per attacker (self allowed).
    pub battle_damage_from: HashMap<String, f64>,

    // --- Attacker tracking (two-deep history) ---
    /// Most recent distinct attacker ("" = nobody yet).
    pub last_person_who_damaged_me: String,
    pub last_damage_time: f64,
    pub last_damage_was_from: DamageFrom,
    /// Second-most-recent distinct attacker, for kill-steal disambiguation.
    pub previous_person_who_damaged_me: String,
    pub previous_last_damage_time: f64,

    // --- Death bookkeeping ---
    /// Position in the match death sequence; -1 while alive.
    pub death_order: i32,
    /// Seconds since match start; -1 while alive.
    pub death_time: f64,
    pub gm_kill_reason: GmKillReason,

    // --- Misc bookkeeping ---
    pub everyone_who_damaged_me: HashSet<String>,
    pub damage_types_taken: HashSet<DamageFrom>,
    /// Part count seen on the previous vitals refresh.
    pub previous_part_count: u32,
    pub remaining_health: f64,
}

impl ScoringData {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            death_order: -1,
            death_time: -1.0,
            ..Default::default()
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive_state == AliveState::Alive
    }

    /// Whether anyone has ever damaged this combatant.
    pub fn has_been_damaged(&self) -> bool {
        self.last_damage_was_from != DamageFrom::None
    }

    /// Whether a second distinct attacker exists in the history.
    pub fn has_previous_attacker(&self) -> bool {
        !self.previous_person_who_damaged_me.is_empty()
    }
}
