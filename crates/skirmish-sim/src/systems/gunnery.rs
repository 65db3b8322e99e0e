//! Scripted weapon fire.
//!
//! Applies timeline actions from the scenario: registers the fire/hit/damage
//! events with the adjudicator exactly as a weapon manager would, and applies
//! the corresponding structural damage to the world.

use hecs::World;
use tracing::debug;

use skirmish_judge::MatchAdjudicator;

use crate::components::{Airframe, Craft, Pilot};
use crate::scenario::Action;

/// Health knocked off per damaged part over and above raw damage.
const PART_DAMAGE_HEALTH: f64 = 4.0;

/// Apply one scripted action to the world and the adjudicator.
pub fn apply(world: &mut World, judge: &mut MatchAdjudicator, action: &Action) {
    match action {
        Action::GunBurst {
            attacker,
            victim,
            rounds,
            hits,
            damage_per_hit,
        } => {
            for _ in 0..*rounds {
                judge.register_shot(attacker);
            }
            for _ in 0..*hits {
                judge.register_hit_guns(attacker, victim);
            }
            let total = *hits as f64 * damage_per_hit;
            if total > 0.0 {
                judge.register_damage_guns(attacker, victim, total);
                damage_health(world, victim, total);
            }
        }
        Action::RocketStrike {
            attacker,
            victim,
            parts,
            damage,
        } => {
            judge.register_rocket_fired(attacker);
            judge.register_hit_rockets(attacker, victim);
            judge.register_part_hit_rockets(attacker, victim, *parts);
            judge.register_damage_rockets(attacker, victim, *damage);
            damage_structure(world, victim, *parts, *damage);
        }
        Action::MissileHit {
            attacker,
            victim,
            parts,
            damage,
        } => {
            judge.register_hit_missiles(attacker, victim);
            judge.register_part_hit_missiles(attacker, victim, *parts);
            judge.register_damage_missiles(attacker, victim, *damage);
            damage_structure(world, victim, *parts, *damage);
        }
        Action::BattleDamage {
            attacker,
            victim,
            damage,
        } => {
            judge.register_damage_battle(attacker, victim, *damage);
            damage_health(world, victim, *damage);
        }
        Action::GmKill { victim, reason } => {
            debug!(victim = %victim, ?reason, "GM kill ordered");
            judge.register_death(victim, *reason);
            despawn_by_name(world, victim);
        }
        Action::SetRamTarget { craft, target } => {
            for (_entity, (c, pilot)) in world.query_mut::<(&Craft, &mut Pilot)>() {
                if &c.name == craft {
                    pilot.ram_target = target.clone();
                }
            }
        }
    }
}

fn damage_health(world: &mut World, victim: &str, amount: f64) {
    for (_entity, (craft, airframe)) in world.query_mut::<(&Craft, &mut Airframe)>() {
        if craft.name == victim {
            airframe.health = (airframe.health - amount).max(0.0);
        }
    }
}

fn damage_structure(world: &mut World, victim: &str, parts: u32, damage: f64) {
    for (_entity, (craft, airframe)) in world.query_mut::<(&Craft, &mut Airframe)>() {
        if craft.name == victim {
            let lost = parts.min(airframe.part_count);
            airframe.part_count -= lost;
            airframe.health =
                (airframe.health - damage - lost as f64 * PART_DAMAGE_HEALTH).max(0.0);
            if airframe.part_count == 0 {
                airframe.health = 0.0;
            }
        }
    }
}

fn despawn_by_name(world: &mut World, name: &str) {
    let entity = world
        .query_mut::<&Craft>()
        .into_iter()
        .find(|(_entity, craft)| craft.name == name)
        .map(|(entity, _)| entity);
    if let Some(entity) = entity {
        let _ = world.despawn(entity);
    }
}
