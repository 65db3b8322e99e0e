//! Entity spawn factories for setting up a match world.

use hecs::World;

use crate::components::{Airframe, Craft, Pilot};
use crate::scenario::{CraftSpec, Scenario};

/// Spawn every craft on the scenario roster.
pub fn setup_match(world: &mut World, scenario: &Scenario) {
    for spec in &scenario.craft {
        spawn_craft(world, spec);
    }
}

/// Spawn a single craft with its full component bundle.
pub fn spawn_craft(world: &mut World, spec: &CraftSpec) -> hecs::Entity {
    world.spawn((
        Craft {
            name: spec.name.clone(),
            team: spec.team.clone(),
        },
        Airframe {
            radius: spec.radius,
            part_count: spec.part_count,
            health: spec.health,
        },
        Pilot {
            ram_target: spec.ram_target.clone(),
        },
        spec.position,
        spec.velocity,
    ))
}
