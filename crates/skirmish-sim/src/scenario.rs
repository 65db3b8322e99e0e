//! Scenario definitions: craft rosters and scripted weapon timelines.
//!
//! Scenarios are plain serde data so they can be loaded from JSON by the
//! match-runner, plus a few hardcoded setups used by tests and demos.

use std::path::Path;

use serde::{Deserialize, Serialize};
use skirmish_core::enums::GmKillReason;
use skirmish_core::types::{Position, Velocity};

use crate::error::{Result, SimError};

/// One craft on the starting roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CraftSpec {
    pub name: String,
    pub team: String,
    pub position: Position,
    pub velocity: Velocity,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_part_count")]
    pub part_count: u32,
    #[serde(default = "default_health")]
    pub health: f64,
    /// Set at spawn time; can be changed mid-match by a scripted order.
    #[serde(default)]
    pub ram_target: Option<String>,
}

fn default_radius() -> f64 {
    10.0
}

fn default_part_count() -> u32 {
    20
}

fn default_health() -> f64 {
    100.0
}

/// A scripted action applied when its time comes up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// A burst of gunfire: `rounds` shots, `hits` of which land.
    GunBurst {
        attacker: String,
        victim: String,
        rounds: u32,
        hits: u32,
        damage_per_hit: f64,
    },
    /// A rocket fired and striking, damaging `parts` parts.
    RocketStrike {
        attacker: String,
        victim: String,
        parts: u32,
        damage: f64,
    },
    /// A missile hit damaging `parts` parts.
    MissileHit {
        attacker: String,
        victim: String,
        parts: u32,
        damage: f64,
    },
    /// Host-computed attrition (fire spread, fuel starvation, …).
    BattleDamage {
        attacker: String,
        victim: String,
        damage: f64,
    },
    /// The GM removes a craft from the match.
    GmKill {
        victim: String,
        reason: GmKillReason,
    },
    /// Change a pilot's ram order mid-match.
    SetRamTarget {
        craft: String,
        target: Option<String>,
    },
}

/// A timestamped scripted action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedAction {
    pub time: f64,
    #[serde(flatten)]
    pub action: Action,
}

/// A complete match setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Hard stop for the match clock (seconds).
    pub duration: f64,
    pub craft: Vec<CraftSpec>,
    #[serde(default)]
    pub actions: Vec<TimedAction>,
}

impl Scenario {
    /// Load a scenario from a JSON file and validate its references.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let scenario: Scenario = serde_json::from_str(&text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.craft.len() < 2 {
            return Err(SimError::InvalidScenario(
                "a match needs at least two craft".to_string(),
            ));
        }
        for spec in &self.craft {
            if let Some(target) = &spec.ram_target {
                if !self.craft.iter().any(|c| &c.name == target) {
                    return Err(SimError::InvalidScenario(format!(
                        "{} has unknown ram target {}",
                        spec.name, target
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Two craft charging each other nose-to-nose, both ordered to ram.
pub fn head_on_joust() -> Scenario {
    Scenario {
        name: "head-on-joust".to_string(),
        duration: 30.0,
        craft: vec![
            CraftSpec {
                name: "Raptor".to_string(),
                team: "Red".to_string(),
                position: Position::new(-600.0, 0.0, 500.0),
                velocity: Velocity::new(120.0, 0.0, 0.0),
                radius: default_radius(),
                part_count: default_part_count(),
                health: default_health(),
                ram_target: Some("Mule".to_string()),
            },
            CraftSpec {
                name: "Mule".to_string(),
                team: "Blue".to_string(),
                position: Position::new(600.0, 0.0, 500.0),
                velocity: Velocity::new(-120.0, 0.0, 0.0),
                radius: default_radius(),
                part_count: default_part_count(),
                health: default_health(),
                ram_target: Some("Raptor".to_string()),
            },
        ],
        actions: Vec::new(),
    }
}

/// A deliberate rammer against a slower craft crossing its path.
pub fn broadside_ram() -> Scenario {
    Scenario {
        name: "broadside-ram".to_string(),
        duration: 40.0,
        craft: vec![
            CraftSpec {
                name: "Lance".to_string(),
                team: "Red".to_string(),
                position: Position::new(-500.0, 0.0, 500.0),
                velocity: Velocity::new(140.0, 0.0, 0.0),
                radius: default_radius(),
                part_count: default_part_count(),
                health: default_health(),
                ram_target: Some("Freighter".to_string()),
            },
            CraftSpec {
                name: "Freighter".to_string(),
                team: "Blue".to_string(),
                position: Position::new(0.0, -300.0, 500.0),
                velocity: Velocity::new(0.0, 60.0, 0.0),
                radius: 14.0,
                part_count: 30,
                health: default_health(),
                ram_target: None,
            },
        ],
        actions: Vec::new(),
    }
}

/// A guns duel settled by script: two bursts from each side, one lethal.
pub fn gun_duel() -> Scenario {
    Scenario {
        name: "gun-duel".to_string(),
        duration: 60.0,
        craft: vec![
            CraftSpec {
                name: "Saber".to_string(),
                team: "Red".to_string(),
                position: Position::new(-800.0, 0.0, 800.0),
                velocity: Velocity::new(90.0, 0.0, 0.0),
                radius: default_radius(),
                part_count: default_part_count(),
                health: default_health(),
                ram_target: None,
            },
            CraftSpec {
                name: "Cutlass".to_string(),
                team: "Blue".to_string(),
                position: Position::new(800.0, 200.0, 800.0),
                velocity: Velocity::new(-90.0, 0.0, 0.0),
                radius: default_radius(),
                part_count: default_part_count(),
                health: default_health(),
                ram_target: None,
            },
        ],
        actions: vec![
            TimedAction {
                time: 5.0,
                action: Action::GunBurst {
                    attacker: "Saber".to_string(),
                    victim: "Cutlass".to_string(),
                    rounds: 30,
                    hits: 4,
                    damage_per_hit: 6.0,
                },
            },
            TimedAction {
                time: 8.0,
                action: Action::GunBurst {
                    attacker: "Cutlass".to_string(),
                    victim: "Saber".to_string(),
                    rounds: 25,
                    hits: 2,
                    damage_per_hit: 6.0,
                },
            },
            TimedAction {
                time: 12.0,
                action: Action::GunBurst {
                    attacker: "Saber".to_string(),
                    victim: "Cutlass".to_string(),
                    rounds: 40,
                    hits: 13,
                    damage_per_hit: 6.0,
                },
            },
        ],
    }
}

/// Look up a built-in scenario by name.
pub fn builtin(name: &str) -> Option<Scenario> {
    match name {
        "head-on-joust" => Some(head_on_joust()),
        "broadside-ram" => Some(broadside_ram()),
        "gun-duel" => Some(gun_duel()),
        _ => None,
    }
}
