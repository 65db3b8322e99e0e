//! Movement integration and ram steering.

use std::collections::HashMap;

use hecs::World;

use skirmish_core::types::{Position, Velocity};

use crate::components::{Craft, Pilot};

/// Steer ramming pilots into their targets, then integrate positions.
pub fn run(world: &mut World, dt: f64) {
    // Target positions first, so steering sees a consistent frame.
    let positions: HashMap<String, Position> = world
        .query_mut::<(&Craft, &Position)>()
        .into_iter()
        .map(|(_entity, (craft, pos))| (craft.name.clone(), *pos))
        .collect();

    for (_entity, (pilot, pos, vel)) in world.query_mut::<(&Pilot, &Position, &mut Velocity)>() {
        let Some(target) = &pilot.ram_target else { continue };
        let Some(target_pos) = positions.get(target) else { continue };
        let to_target = target_pos.to_dvec3() - pos.to_dvec3();
        if to_target.length_squared() < 1.0 {
            continue;
        }
        // Hold current speed, point the nose at the target.
        let speed = vel.speed();
        if speed > 0.0 {
            *vel = Velocity::from_dvec3(to_target.normalize() * speed);
        }
    }

    for (_entity, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;
    }
}
