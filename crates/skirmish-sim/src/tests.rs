//! Whole-match tests: scenarios driven end-to-end through the harness and
//! adjudicator, checked against the rendered report.

use skirmish_core::enums::{AliveState, GmKillReason};
use skirmish_core::events::MatchEvent;
use skirmish_core::types::{Position, Velocity};

use crate::engine::{HarnessConfig, MatchHarness};
use crate::scenario::{self, Action, CraftSpec, Scenario, TimedAction};

fn spec(name: &str, team: &str, pos: (f64, f64, f64), vel: (f64, f64, f64)) -> CraftSpec {
    CraftSpec {
        name: name.to_string(),
        team: team.to_string(),
        position: Position::new(pos.0, pos.1, pos.2),
        velocity: Velocity::new(vel.0, vel.1, vel.2),
        radius: 10.0,
        part_count: 20,
        health: 100.0,
        ram_target: None,
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = HarnessConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut harness_a = MatchHarness::new(scenario::head_on_joust(), config.clone()).unwrap();
    let mut harness_b = MatchHarness::new(scenario::head_on_joust(), config).unwrap();

    let report_a = harness_a.run();
    let report_b = harness_b.run();
    assert_eq!(report_a, report_b, "Reports diverged with the same seed");

    let events_a = serde_json::to_string(harness_a.events()).unwrap();
    let events_b = serde_json::to_string(harness_b.events()).unwrap();
    assert_eq!(events_a, events_b, "Event logs diverged with the same seed");
}

// ---- Ramming scenarios ----

#[test]
fn test_head_on_joust_mutual_attribution() {
    let mut harness =
        MatchHarness::new(scenario::head_on_joust(), HarnessConfig::default()).unwrap();
    let report = harness.run();

    // Both chargers declared intent and both flew nose-on: every settled
    // collision is mutual, so each side holds ram losses from the other.
    assert!(report
        .iter()
        .any(|l| l.starts_with("WHORAMMEDME:Mule:") && l.ends_with(":Raptor")));
    assert!(report
        .iter()
        .any(|l| l.starts_with("WHORAMMEDME:Raptor:") && l.ends_with(":Mule")));
    assert!(harness
        .events()
        .iter()
        .any(|e| matches!(e, MatchEvent::RamAttributed { head_on: true, .. })));
}

#[test]
fn test_broadside_ram_one_sided_attribution() {
    let mut harness =
        MatchHarness::new(scenario::broadside_ram(), HarnessConfig::default()).unwrap();
    let report = harness.run();

    // Lance chased and struck; Freighter never rammed anyone.
    assert!(report
        .iter()
        .any(|l| l.starts_with("WHORAMMEDME:Freighter:") && l.ends_with(":Lance")));
    assert!(!report.iter().any(|l| l.starts_with("WHORAMMEDME:Lance:")));
    assert!(harness.events().iter().any(|e| matches!(
        e,
        MatchEvent::RamAttributed { rammer, head_on: false, .. } if rammer == "Lance"
    )));
}

// ---- Scripted gunnery ----

#[test]
fn test_gun_duel_clean_kill() {
    let mut harness = MatchHarness::new(scenario::gun_duel(), HarnessConfig::default()).unwrap();
    let report = harness.run();

    // The final burst kills Cutlass within the head-shot window.
    assert!(report.contains(&"RESULT:WIN:Red:Saber".to_string()));
    assert!(report.contains(&"CLEANKILL:Cutlass:Saber".to_string()));
    assert!(report
        .iter()
        .any(|l| l.starts_with("DEAD:0:") && l.ends_with(":Cutlass")));
    assert!(report.contains(&"ACCURACY:Saber:17/70:0/0".to_string()));
    assert!(report.contains(&"ACCURACY:Cutlass:2/25:0/0".to_string()));
    assert!(report
        .iter()
        .any(|l| l.starts_with("WHODAMAGEDMEWITHGUNS:Cutlass:102.0:Saber")));
}

#[test]
fn test_stale_damage_is_assisted_kill() {
    let scenario = Scenario {
        name: "slow-burn".to_string(),
        duration: 40.0,
        craft: vec![
            spec("Hunter", "Red", (-2000.0, 0.0, 500.0), (50.0, 0.0, 0.0)),
            spec("Target", "Blue", (2000.0, 0.0, 500.0), (0.0, 50.0, 0.0)),
        ],
        actions: vec![
            TimedAction {
                time: 2.0,
                action: Action::GunBurst {
                    attacker: "Hunter".to_string(),
                    victim: "Target".to_string(),
                    rounds: 10,
                    hits: 3,
                    damage_per_hit: 10.0,
                },
            },
            // The victim burns down long after the hits stopped.
            TimedAction {
                time: 30.0,
                action: Action::BattleDamage {
                    attacker: "Target".to_string(),
                    victim: "Target".to_string(),
                    damage: 80.0,
                },
            },
        ],
    };
    let mut harness = MatchHarness::new(scenario, HarnessConfig::default()).unwrap();
    let report = harness.run();

    let ledger = harness.judge().ledger();
    assert_eq!(
        ledger.get("Target").unwrap().alive_state,
        AliveState::AssistedKill
    );
    assert!(!report.iter().any(|l| l.starts_with("CLEANKILL:")));
    assert!(report
        .iter()
        .any(|l| l.starts_with("WHODAMAGEDMEWITHBATTLEDAMAGE:Target:80.0:Target")));
}

#[test]
fn test_gm_kill_reported() {
    let scenario = Scenario {
        name: "gm-intervention".to_string(),
        duration: 20.0,
        craft: vec![
            spec("Idler", "Red", (-3000.0, 0.0, 500.0), (10.0, 0.0, 0.0)),
            spec("Winner", "Blue", (3000.0, 0.0, 500.0), (0.0, 10.0, 0.0)),
        ],
        actions: vec![TimedAction {
            time: 10.0,
            action: Action::GmKill {
                victim: "Idler".to_string(),
                reason: GmKillReason::OutOfAmmo,
            },
        }],
    };
    let mut harness = MatchHarness::new(scenario, HarnessConfig::default()).unwrap();
    let report = harness.run();

    assert!(report.contains(&"GMKILL:Idler:OutOfAmmo".to_string()));
    assert!(report.contains(&"RESULT:WIN:Blue:Winner".to_string()));
    assert_eq!(
        harness.judge().ledger().get("Idler").unwrap().alive_state,
        AliveState::Dead
    );
}

// ---- Scenario plumbing ----

#[test]
fn test_scenario_validation() {
    let lonely = Scenario {
        name: "lonely".to_string(),
        duration: 10.0,
        craft: vec![spec("Solo", "Red", (0.0, 0.0, 0.0), (0.0, 0.0, 0.0))],
        actions: Vec::new(),
    };
    assert!(lonely.validate().is_err());

    let mut bad_target = scenario::head_on_joust();
    bad_target.craft[0].ram_target = Some("Nobody".to_string());
    assert!(bad_target.validate().is_err());

    assert!(scenario::head_on_joust().validate().is_ok());
}

#[test]
fn test_scenario_json_round_trip() {
    let original = scenario::gun_duel();
    let json = serde_json::to_string_pretty(&original).unwrap();
    let back: Scenario = serde_json::from_str(&json).unwrap();
    assert_eq!(back.name, original.name);
    assert_eq!(back.craft.len(), original.craft.len());
    assert_eq!(back.actions.len(), original.actions.len());

    let path = std::env::temp_dir().join("skirmish-scenario-round-trip.json");
    std::fs::write(&path, &json).unwrap();
    let loaded = Scenario::load(&path).unwrap();
    assert_eq!(loaded.craft[1].name, original.craft[1].name);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_builtin_lookup() {
    assert!(scenario::builtin("head-on-joust").is_some());
    assert!(scenario::builtin("broadside-ram").is_some());
    assert!(scenario::builtin("gun-duel").is_some());
    assert!(scenario::builtin("no-such-thing").is_none());
}

#[test]
fn test_snapshot_reflects_world() {
    let harness =
        MatchHarness::new(scenario::broadside_ram(), HarnessConfig::default()).unwrap();
    let snapshot = harness.snapshot();
    assert_eq!(snapshot.len(), 2);
    let lance = snapshot.state("Lance").unwrap();
    assert!(lance.ram_intent);
    assert_eq!(lance.part_count, 20);
    let freighter = snapshot.state("Freighter").unwrap();
    assert!(!freighter.ram_intent);
    assert_eq!(freighter.radius, 14.0);
}
