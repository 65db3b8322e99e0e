//! The match harness engine.
//!
//! Owns the hecs world and a `MatchAdjudicator`, and runs the per-tick
//! pipeline: scripted weapon fire, movement, contact detection, adjudicator
//! tick, destruction scan, and deferred death registration. Completely
//! headless, enabling deterministic whole-match tests.

use std::collections::HashMap;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use skirmish_core::config::MatchConfig;
use skirmish_core::constants::TICK_RATE;
use skirmish_core::enums::GmKillReason;
use skirmish_core::events::MatchEvent;
use skirmish_core::types::{Position, SimTime, Velocity};
use skirmish_judge::{ArenaSnapshot, CombatantState, MatchAdjudicator};

use crate::components::{Airframe, Craft, Pilot};
use crate::error::Result;
use crate::scenario::Scenario;
use crate::systems;
use crate::world_setup;

/// Delay between a craft's destruction and its death registration, standing
/// in for the host's slow liveness polling. Longer than the collision
/// settling delay (so ram attribution lands first) but inside the head-shot
/// window of the collision itself.
const DEATH_POLL_DELAY: f64 = 1.8;

/// Bound on post-match flushing of deferred deaths (seconds).
const FLUSH_LIMIT: f64 = 10.0;

/// Configuration for a harness run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// RNG seed for collision damage rolls. Same seed = same match.
    pub seed: u64,
    pub match_config: MatchConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            match_config: MatchConfig::default(),
        }
    }
}

/// The harness engine. Owns the world, the clock, and the adjudicator.
pub struct MatchHarness {
    world: World,
    time: SimTime,
    judge: MatchAdjudicator,
    scenario: Scenario,
    rng: ChaCha8Rng,
    /// Scenario actions sorted by time; index of the next one due.
    action_cursor: usize,
    /// Destroyed craft awaiting death registration: (name, due time).
    pending_deaths: Vec<(String, f64)>,
    contact_cooldowns: HashMap<(String, String), f64>,
    event_log: Vec<MatchEvent>,
}

impl MatchHarness {
    pub fn new(scenario: Scenario, config: HarnessConfig) -> Result<Self> {
        scenario.validate()?;
        let mut scenario = scenario;
        scenario
            .actions
            .sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal));

        let mut world = World::new();
        world_setup::setup_match(&mut world, &scenario);

        let mut harness = Self {
            world,
            time: SimTime::default(),
            judge: MatchAdjudicator::new(config.match_config),
            scenario,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            action_cursor: 0,
            pending_deaths: Vec::new(),
            contact_cooldowns: HashMap::new(),
            event_log: Vec::new(),
        };
        let snapshot = harness.snapshot();
        harness.judge.configure(&snapshot);
        Ok(harness)
    }

    /// Advance the match by one fixed step.
    pub fn tick(&mut self) {
        let now = self.time.elapsed_secs;

        // 1. Scripted weapon fire due this tick.
        while self.action_cursor < self.scenario.actions.len()
            && self.scenario.actions[self.action_cursor].time <= now
        {
            let action = self.scenario.actions[self.action_cursor].action.clone();
            systems::gunnery::apply(&mut self.world, &mut self.judge, &action);
            self.action_cursor += 1;
        }

        // 2. Steering and movement integration.
        systems::movement::run(&mut self.world, self.time.dt());

        // 3. Physics contacts: damage, bounce, and contact callbacks.
        let touched = systems::contact::run(
            &mut self.world,
            &mut self.rng,
            &mut self.contact_cooldowns,
            now,
        );
        for owner in touched {
            self.judge.report_contact(&owner);
        }

        // 4. Adjudication over this tick's snapshot.
        let snapshot = self.snapshot();
        self.judge.tick(&snapshot);

        // 5. Destruction scan: despawn dead craft, defer their death
        //    registration to mimic the host's liveness polling.
        let mut destroyed = Vec::new();
        for (entity, (craft, airframe)) in self.world.query_mut::<(&Craft, &Airframe)>() {
            if airframe.part_count == 0 || airframe.health <= 0.0 {
                destroyed.push((entity, craft.name.clone()));
            }
        }
        for (entity, name) in destroyed {
            debug!(name = %name, "craft destroyed");
            let _ = self.world.despawn(entity);
            self.pending_deaths.push((name, now + DEATH_POLL_DELAY));
        }

        // 6. Deaths whose polling delay has elapsed.
        let due: Vec<String> = self
            .pending_deaths
            .iter()
            .filter(|(_, due)| *due <= now)
            .map(|(name, _)| name.clone())
            .collect();
        self.pending_deaths.retain(|(_, due)| *due > now);
        for name in due {
            self.judge.register_death(&name, GmKillReason::None);
        }

        self.event_log.extend(self.judge.drain_events());
        self.time.advance();
    }

    /// Run the full scenario, flush deferred deaths, and return the report.
    pub fn run(&mut self) -> Vec<String> {
        let duration_ticks = (self.scenario.duration * TICK_RATE as f64) as u64;
        while self.time.tick < duration_ticks {
            self.tick();
        }
        let flush_ticks = self.time.tick + (FLUSH_LIMIT * TICK_RATE as f64) as u64;
        while !self.pending_deaths.is_empty() && self.time.tick < flush_ticks {
            self.tick();
        }
        self.finalize()
    }

    /// End the match and render the result report.
    pub fn finalize(&mut self) -> Vec<String> {
        let snapshot = self.snapshot();
        self.judge.finalize(&snapshot)
    }

    /// Build the adjudicator's view of the current world.
    pub fn snapshot(&self) -> ArenaSnapshot {
        let mut snapshot = ArenaSnapshot::new(self.time.elapsed_secs);
        let mut query = self
            .world
            .query::<(&Craft, &Airframe, &Pilot, &Position, &Velocity)>();
        for (_entity, (craft, airframe, pilot, pos, vel)) in query.iter() {
            snapshot.push(CombatantState {
                id: craft.name.clone(),
                team: craft.team.clone(),
                position: *pos,
                velocity: *vel,
                radius: airframe.radius,
                part_count: airframe.part_count,
                health: airframe.health,
                ram_intent: pilot.intends_to_ram(),
            });
        }
        snapshot
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn judge(&self) -> &MatchAdjudicator {
        &self.judge
    }

    pub fn judge_mut(&mut self) -> &mut MatchAdjudicator {
        &mut self.judge
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.event_log
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}
