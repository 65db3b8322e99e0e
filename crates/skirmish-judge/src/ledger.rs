//! The combat ledger: event registration and death classification over the
//! per-combatant scoring store.
//!
//! Every operation is idempotent-safe and returns `bool`: malformed, stale,
//! or duplicate input is rejected with no state change. One bad event must
//! never take the match down.

use std::collections::HashMap;

use tracing::debug;

use skirmish_core::config::MatchConfig;
use skirmish_core::enums::{AliveState, DamageFrom, GmKillReason};
use skirmish_core::events::MatchEvent;
use skirmish_core::scoring::ScoringData;

use crate::arena::{ArenaSnapshot, CombatantState};

/// Scoring and attribution state for one match.
#[derive(Debug, Clone, Default)]
pub struct CombatLedger {
    config: MatchConfig,
    scores: HashMap<String, ScoringData>,
    /// Combatant names in death order; index == death_order.
    death_sequence: Vec<String>,
    start_time: f64,
    now: f64,
}

impl CombatLedger {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            scores: HashMap::new(),
            death_sequence: Vec::new(),
            start_time: 0.0,
            now: 0.0,
        }
    }

    /// Reset the ledger for a new match and register everyone in the snapshot.
    pub fn configure(&mut self, arena: &ArenaSnapshot) {
        self.scores.clear();
        self.death_sequence.clear();
        self.start_time = arena.time;
        self.now = arena.time;
        for state in arena.iter() {
            self.scores
                .insert(state.id.clone(), Self::fresh_entry(state));
        }
    }

    /// Register a combatant joining mid-match.
    pub fn add(&mut self, state: &CombatantState) -> bool {
        if self.scores.contains_key(&state.id) {
            return false;
        }
        self.scores
            .insert(state.id.clone(), Self::fresh_entry(state));
        true
    }

    fn fresh_entry(state: &CombatantState) -> ScoringData {
        let mut data = ScoringData::new(&state.team);
        data.previous_part_count = state.part_count;
        data.remaining_health = state.health;
        data
    }

    /// Advance the ledger clock. Called by the match context once per tick;
    /// event registrations between ticks use the most recent tick time.
    pub fn set_time(&mut self, now: f64) {
        self.now = now;
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    // --- Queries ---

    pub fn contains(&self, id: &str) -> bool {
        self.scores.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ScoringData> {
        self.scores.get(id)
    }

    pub fn is_alive(&self, id: &str) -> bool {
        self.scores.get(id).map(|d| d.is_alive()).unwrap_or(false)
    }

    pub fn players(&self) -> impl Iterator<Item = &str> + Clone {
        self.scores.keys().map(String::as_str)
    }

    pub fn scores(&self) -> &HashMap<String, ScoringData> {
        &self.scores
    }

    pub fn death_sequence(&self) -> &[String] {
        &self.death_sequence
    }

    // --- Firing ---

    pub fn register_shot(&mut self, shooter: &str) -> bool {
        if !self.is_alive(shooter) {
            return false;
        }
        self.scores.get_mut(shooter).unwrap().shots_fired += 1;
        true
    }

    pub fn register_rocket_fired(&mut self, shooter: &str) -> bool {
        if !self.is_alive(shooter) {
            return false;
        }
        self.scores.get_mut(shooter).unwrap().rockets_fired += 1;
        true
    }

    // --- Hits and damage ---

    /// Common acceptance test for the hit/damage family: both parties
    /// registered, a living victim, and no self-damage unless allowed.
    fn accepts(&self, attacker: &str, victim: &str, allow_self: bool) -> bool {
        if !self.scores.contains_key(attacker) || !self.scores.contains_key(victim) {
            return false;
        }
        if !allow_self && attacker == victim {
            return false;
        }
        self.is_alive(victim)
    }

    /// Two-deep attacker history update: a new distinct attacker shifts the
    /// old "last" into "previous" before taking the slot.
    fn note_attacker(data: &mut ScoringData, attacker: &str, time: f64, source: DamageFrom) {
        if data.last_person_who_damaged_me != attacker {
            data.previous_person_who_damaged_me =
                std::mem::take(&mut data.last_person_who_damaged_me);
            data.previous_last_damage_time = data.last_damage_time;
            data.last_person_who_damaged_me = attacker.to_string();
        }
        data.last_damage_time = time;
        data.last_damage_was_from = source;
        data.everyone_who_damaged_me.insert(attacker.to_string());
        data.damage_types_taken.insert(source);
    }

    pub fn register_hit_guns(&mut self, attacker: &str, victim: &str) -> bool {
        if !self.accepts(attacker, victim, false) {
            return false;
        }
        let now = self.now;
        let data = self.scores.get_mut(victim).unwrap();
        *data.hit_counts.entry(attacker.to_string()).or_insert(0) += 1;
        Self::note_attacker(data, attacker, now, DamageFrom::Guns);
        self.scores.get_mut(attacker).unwrap().hits_landed += 1;
        true
    }

    pub fn register_damage_guns(&mut self, attacker: &str, victim: &str, damage: f64) -> bool {
        if damage <= 0.0 || !self.accepts(attacker, victim, false) {
            return false;
        }
        let now = self.now;
        let data = self.scores.get_mut(victim).unwrap();
        *data
            .damage_from_guns
            .entry(attacker.to_string())
            .or_insert(0.0) += damage;
        Self::note_attacker(data, attacker, now, DamageFrom::Guns);
        true
    }

    pub fn register_hit_rockets(&mut self, attacker: &str, victim: &str) -> bool {
        if !self.accepts(attacker, victim, false) {
            return false;
        }
        let now = self.now;
        let data = self.scores.get_mut(victim).unwrap();
        *data
            .rocket_strike_counts
            .entry(attacker.to_string())
            .or_insert(0) += 1;
        Self::note_attacker(data, attacker, now, DamageFrom::Rockets);
        self.scores.get_mut(attacker).unwrap().rocket_strikes_landed += 1;
        true
    }

    pub fn register_part_hit_rockets(&mut self, attacker: &str, victim: &str, parts: u32) -> bool {
        if parts == 0 || !self.accepts(attacker, victim, false) {
            return false;
        }
        let now = self.now;
        let data = self.scores.get_mut(victim).unwrap();
        *data
            .rocket_part_damage_counts
            .entry(attacker.to_string())
            .or_insert(0) += parts;
        Self::note_attacker(data, attacker, now, DamageFrom::Rockets);
        true
    }

    pub fn register_damage_rockets(&mut self, attacker: &str, victim: &str, damage: f64) -> bool {
        if damage <= 0.0 || !self.accepts(attacker, victim, false) {
            return false;
        }
        let now = self.now;
        let data = self.scores.get_mut(victim).unwrap();
        *data
            .damage_from_rockets
            .entry(attacker.to_string())
            .or_insert(0.0) += damage;
        Self::note_attacker(data, attacker, now, DamageFrom::Rockets);
        true
    }

    pub fn register_hit_missiles(&mut self, attacker: &str, victim: &str) -> bool {
        if !self.accepts(attacker, victim, false) {
            return false;
        }
        let now = self.now;
        let data = self.scores.get_mut(victim).unwrap();
        *data
            .missile_hit_counts
            .entry(attacker.to_string())
            .or_insert(0) += 1;
        Self::note_attacker(data, attacker, now, DamageFrom::Missiles);
        true
    }

    pub fn register_part_hit_missiles(&mut self, attacker: &str, victim: &str, parts: u32) -> bool {
        if parts == 0 || !self.accepts(attacker, victim, false) {
            return false;
        }
        let now = self.now;
        let data = self.scores.get_mut(victim).unwrap();
        *data
            .missile_part_damage_counts
            .entry(attacker.to_string())
            .or_insert(0) += parts;
        Self::note_attacker(data, attacker, now, DamageFrom::Missiles);
        true
    }

    pub fn register_damage_missiles(&mut self, attacker: &str, victim: &str, damage: f64) -> bool {
        if damage <= 0.0 || !self.accepts(attacker, victim, false) {
            return false;
        }
        let now = self.now;
        let data = self.scores.get_mut(victim).unwrap();
        *data
            .damage_from_missiles
            .entry(attacker.to_string())
            .or_insert(0.0) += damage;
        Self::note_attacker(data, attacker, now, DamageFrom::Missiles);
        true
    }

    /// Battle damage is host-computed attrition; self-damage is legitimate
    /// (a craft tearing itself apart) and it never shifts attacker tracking.
    pub fn register_damage_battle(&mut self, attacker: &str, victim: &str, damage: f64) -> bool {
        if damage <= 0.0 || !self.accepts(attacker, victim, true) {
            return false;
        }
        let data = self.scores.get_mut(victim).unwrap();
        *data
            .battle_damage_from
            .entry(attacker.to_string())
            .or_insert(0.0) += damage;
        true
    }

    // --- Ramming ---

    /// Rams are confirmed asynchronously, so the attacker history update is
    /// ordered against the collision time rather than "now": a ram newer
    /// than the current "last" damage shifts history as usual, while one
    /// that lands between the two slots only replaces "previous".
    pub fn register_ram(
        &mut self,
        attacker: &str,
        victim: &str,
        time_of_collision: f64,
        parts_lost: u32,
    ) -> bool {
        if !self.accepts(attacker, victim, false) {
            return false;
        }
        let data = self.scores.get_mut(victim).unwrap();
        if parts_lost > 0 {
            *data
                .ramming_part_loss_counts
                .entry(attacker.to_string())
                .or_insert(0) += parts_lost;
        }
        data.everyone_who_damaged_me.insert(attacker.to_string());
        data.damage_types_taken.insert(DamageFrom::Ramming);

        if time_of_collision > data.last_damage_time
            && data.last_person_who_damaged_me != attacker
        {
            data.previous_person_who_damaged_me =
                std::mem::take(&mut data.last_person_who_damaged_me);
            data.previous_last_damage_time = data.last_damage_time;
            data.last_person_who_damaged_me = attacker.to_string();
            data.last_damage_time = time_of_collision;
            data.last_damage_was_from = DamageFrom::Ramming;
        } else if time_of_collision > data.previous_last_damage_time
            && time_of_collision <= data.last_damage_time
            && data.previous_person_who_damaged_me != attacker
        {
            data.previous_person_who_damaged_me = attacker.to_string();
            data.previous_last_damage_time = time_of_collision;
        }
        true
    }

    // --- Vitals ---

    /// Per-tick bookkeeping refresh from the driver.
    pub fn update_vitals(&mut self, id: &str, part_count: u32, health: f64) -> bool {
        match self.scores.get_mut(id) {
            Some(data) => {
                data.previous_part_count = part_count;
                data.remaining_health = health;
                true
            }
            None => false,
        }
    }

    // --- Death ---

    /// Register a death and classify the kill. Idempotent: a second call on
    /// an already-dead combatant is a no-op.
    pub fn register_death(
        &mut self,
        victim: &str,
        gm_reason: GmKillReason,
        events: &mut Vec<MatchEvent>,
    ) -> bool {
        let now = self.now;
        let death_order = self.death_sequence.len() as i32;
        let death_time = now - self.start_time;

        let Some(data) = self.scores.get_mut(victim) else {
            return false;
        };
        if !data.is_alive() {
            return false;
        }

        data.death_order = death_order;
        data.death_time = death_time;
        data.gm_kill_reason = gm_reason;

        data.alive_state = if !data.has_been_damaged() {
            // Died untouched: incompetence, unless the GM ordered it.
            if !gm_reason.is_gm_kill() {
                data.last_damage_was_from = DamageFrom::Incompetence;
            }
            AliveState::Dead
        } else if now - data.last_damage_time < self.config.headshot_window
            && !gm_reason.is_gm_kill()
        {
            if !data.has_previous_attacker() {
                AliveState::CleanKill
            } else if now - data.previous_last_damage_time > self.config.killsteal_window {
                AliveState::HeadShot
            } else {
                AliveState::KillSteal
            }
        } else {
            AliveState::AssistedKill
        };

        let killer = if data.has_been_damaged() && data.last_damage_was_from != DamageFrom::Incompetence {
            Some(data.last_person_who_damaged_me.clone())
        } else {
            None
        };
        debug!(
            victim,
            state = ?data.alive_state,
            order = death_order,
            "death registered"
        );
        events.push(MatchEvent::CombatantDied {
            victim: victim.to_string(),
            classification: data.alive_state,
            killer,
            killed_by: data.last_damage_was_from,
            gm_reason,
        });
        self.death_sequence.push(victim.to_string());
        true
    }
}
