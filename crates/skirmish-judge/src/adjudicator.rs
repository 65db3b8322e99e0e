//! The per-match context object.
//!
//! One `MatchAdjudicator` is constructed at match start and handed (by
//! mutable reference) to every collaborator: weapon systems register fire
//! and damage, the physics layer reports contacts, and the tick driver feeds
//! an [`ArenaSnapshot`] once per fixed step. Its lifetime is the match, not
//! the process.

use skirmish_core::config::MatchConfig;
use skirmish_core::enums::{GmKillReason, MatchPhase};
use skirmish_core::events::MatchEvent;

use crate::arena::{ArenaSnapshot, CombatantState};
use crate::collision::CollisionEngine;
use crate::ledger::CombatLedger;
use crate::reconcile;
use crate::report;

pub struct MatchAdjudicator {
    config: MatchConfig,
    phase: MatchPhase,
    ledger: CombatLedger,
    engine: CollisionEngine,
    events: Vec<MatchEvent>,
    now: f64,
}

impl MatchAdjudicator {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            ledger: CombatLedger::new(config.clone()),
            engine: CollisionEngine::new(config.clone()),
            config,
            phase: MatchPhase::Pending,
            events: Vec::new(),
            now: 0.0,
        }
    }

    /// Start (or restart) a match with the combatants currently in the
    /// arena. Clears all scoring and collision state.
    pub fn configure(&mut self, arena: &ArenaSnapshot) -> bool {
        if arena.is_empty() {
            return false;
        }
        self.now = arena.time;
        self.ledger.configure(arena);
        self.engine.configure(arena);
        self.events.clear();
        self.phase = MatchPhase::Running;
        true
    }

    /// Register a combatant joining mid-match.
    pub fn add(&mut self, state: &CombatantState) -> bool {
        if self.phase != MatchPhase::Running {
            return false;
        }
        let added = self.ledger.add(state);
        self.engine.add_combatant(&state.id, self.now) || added
    }

    /// A combatant left the match. Its scoring history is kept for the
    /// report; collision tracking winds down (deferred while attribution is
    /// in flight).
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.ledger.contains(id) {
            return false;
        }
        self.engine.remove_combatant(id, self.now);
        self.events.push(MatchEvent::CombatantLeft { id: id.to_string() });
        true
    }

    /// One fixed simulation step. Refreshes ledger vitals, then drives the
    /// collision engine's four phases in order.
    pub fn tick(&mut self, arena: &ArenaSnapshot) {
        if self.phase != MatchPhase::Running {
            return;
        }
        self.now = arena.time;
        self.ledger.set_time(arena.time);
        for state in arena.iter() {
            if self.ledger.is_alive(&state.id) {
                self.ledger
                    .update_vitals(&state.id, state.part_count, state.health);
            }
        }
        self.engine
            .tick(arena.time, arena, &mut self.ledger, &mut self.events);
    }

    /// Physics contact callback: the owning combatant of the structural
    /// element that touched something. Returns false if the name could not
    /// be reconciled against the ledger.
    pub fn report_contact(&mut self, element_owner: &str) -> bool {
        match reconcile::resolve_name(element_owner, self.ledger.players()) {
            Some(resolved) => {
                self.engine.report_contact(&resolved, self.now);
                true
            }
            None => {
                self.events.push(MatchEvent::ContactUnresolved {
                    reported_name: element_owner.to_string(),
                });
                false
            }
        }
    }

    // --- Weapon/damage registration (forwarded to the ledger) ---

    pub fn register_shot(&mut self, shooter: &str) -> bool {
        self.ledger.register_shot(shooter)
    }

    pub fn register_rocket_fired(&mut self, shooter: &str) -> bool {
        self.ledger.register_rocket_fired(shooter)
    }

    pub fn register_hit_guns(&mut self, attacker: &str, victim: &str) -> bool {
        self.ledger.register_hit_guns(attacker, victim)
    }

    pub fn register_damage_guns(&mut self, attacker: &str, victim: &str, damage: f64) -> bool {
        self.ledger.register_damage_guns(attacker, victim, damage)
    }

    pub fn register_hit_rockets(&mut self, attacker: &str, victim: &str) -> bool {
        self.ledger.register_hit_rockets(attacker, victim)
    }

    pub fn register_part_hit_rockets(&mut self, attacker: &str, victim: &str, parts: u32) -> bool {
        self.ledger.register_part_hit_rockets(attacker, victim, parts)
    }

    pub fn register_damage_rockets(&mut self, attacker: &str, victim: &str, damage: f64) -> bool {
        self.ledger.register_damage_rockets(attacker, victim, damage)
    }

    pub fn register_hit_missiles(&mut self, attacker: &str, victim: &str) -> bool {
        self.ledger.register_hit_missiles(attacker, victim)
    }

    pub fn register_part_hit_missiles(&mut self, attacker: &str, victim: &str, parts: u32) -> bool {
        self.ledger
            .register_part_hit_missiles(attacker, victim, parts)
    }

    pub fn register_damage_missiles(&mut self, attacker: &str, victim: &str, damage: f64) -> bool {
        self.ledger.register_damage_missiles(attacker, victim, damage)
    }

    pub fn register_damage_battle(&mut self, attacker: &str, victim: &str, damage: f64) -> bool {
        self.ledger.register_damage_battle(attacker, victim, damage)
    }

    pub fn register_ram(
        &mut self,
        attacker: &str,
        victim: &str,
        time_of_collision: f64,
        parts_lost: u32,
    ) -> bool {
        self.ledger
            .register_ram(attacker, victim, time_of_collision, parts_lost)
    }

    pub fn register_death(&mut self, victim: &str, gm_reason: GmKillReason) -> bool {
        self.ledger
            .register_death(victim, gm_reason, &mut self.events)
    }

    pub fn update_vitals(&mut self, id: &str, part_count: u32, health: f64) -> bool {
        self.ledger.update_vitals(id, part_count, health)
    }

    // --- Results ---

    /// End the match and render the result report.
    pub fn finalize(&mut self, arena: &ArenaSnapshot) -> Vec<String> {
        self.phase = MatchPhase::Ended;
        report::render(&self.ledger, arena)
    }

    /// Drain events accumulated since the last call.
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn ledger(&self) -> &CombatLedger {
        &self.ledger
    }

    #[cfg(test)]
    pub fn engine(&self) -> &CollisionEngine {
        &self.engine
    }
}
