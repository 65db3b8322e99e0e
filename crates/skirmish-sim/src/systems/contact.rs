//! Sphere-overlap contact detection and structural collision damage.
//!
//! Plays the role of the physics engine: decides that two bodies touched,
//! knocks parts off both, and bounces them apart. The adjudicator is only
//! told *that* a craft's structure was contacted; attribution is its job.

use std::collections::HashMap;

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::types::{Position, Velocity};

use crate::components::{Airframe, Craft};

/// Minimum time between damage applications for the same pair (seconds).
const CONTACT_COOLDOWN: f64 = 1.0;

/// Health knocked off per lost part.
const HEALTH_PER_PART: f64 = 4.0;

/// Detect overlapping craft, apply collision damage, and return the names
/// of craft whose structure was touched this tick.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    cooldowns: &mut HashMap<(String, String), f64>,
    now: f64,
) -> Vec<String> {
    struct Body {
        entity: hecs::Entity,
        name: String,
        pos: Position,
        vel: Velocity,
        radius: f64,
    }

    let bodies: Vec<Body> = world
        .query_mut::<(&Craft, &Airframe, &Position, &Velocity)>()
        .into_iter()
        .map(|(entity, (craft, airframe, pos, vel))| Body {
            entity,
            name: craft.name.clone(),
            pos: *pos,
            vel: *vel,
            radius: airframe.radius,
        })
        .collect();

    let mut touched = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (&bodies[i], &bodies[j]);
            let combined = a.radius + b.radius;
            if a.pos.sqr_range_to(&b.pos) >= combined * combined {
                continue;
            }

            let pair_key = if a.name < b.name {
                (a.name.clone(), b.name.clone())
            } else {
                (b.name.clone(), a.name.clone())
            };
            if let Some(last) = cooldowns.get(&pair_key) {
                if now - last < CONTACT_COOLDOWN {
                    continue;
                }
            }
            cooldowns.insert(pair_key, now);

            let rel_speed = (a.vel.to_dvec3() - b.vel.to_dvec3()).length();
            apply_impact(world, a.entity, rel_speed, rng);
            apply_impact(world, b.entity, rel_speed, rng);
            bounce(world, a.entity, b.entity);

            touched.push(a.name.clone());
            touched.push(b.name.clone());
        }
    }
    touched
}

/// Knock parts off one craft, scaled by closing speed.
fn apply_impact(world: &mut World, entity: hecs::Entity, rel_speed: f64, rng: &mut ChaCha8Rng) {
    if let Ok(mut airframe) = world.get::<&mut Airframe>(entity) {
        let base = (rel_speed / 60.0) as u32;
        let lost = (base + rng.gen_range(0..=2)).min(airframe.part_count);
        airframe.part_count -= lost;
        airframe.health = (airframe.health - lost as f64 * HEALTH_PER_PART).max(0.0);
        if airframe.part_count == 0 {
            airframe.health = 0.0;
        }
    }
}

/// Crude elastic response along the line of centers, plus positional
/// separation so the pair does not re-trigger every tick.
fn bounce(world: &mut World, ea: hecs::Entity, eb: hecs::Entity) {
    let (pa, va) = match (world.get::<&Position>(ea), world.get::<&Velocity>(ea)) {
        (Ok(p), Ok(v)) => (p.to_dvec3(), v.to_dvec3()),
        _ => return,
    };
    let (pb, vb) = match (world.get::<&Position>(eb), world.get::<&Velocity>(eb)) {
        (Ok(p), Ok(v)) => (p.to_dvec3(), v.to_dvec3()),
        _ => return,
    };
    let delta = pb - pa;
    if delta.length_squared() < 1e-9 {
        return;
    }
    let normal = delta.normalize();
    let approach = (va - vb).dot(normal);
    if approach <= 0.0 {
        return;
    }
    // Equal-mass elastic exchange of the normal component.
    let impulse = normal * approach;
    if let Ok(mut vel) = world.get::<&mut Velocity>(ea) {
        *vel = Velocity::from_dvec3(va - impulse);
    }
    if let Ok(mut vel) = world.get::<&mut Velocity>(eb) {
        *vel = Velocity::from_dvec3(vb + impulse);
    }
}
