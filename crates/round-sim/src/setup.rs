//! Round Setup
//!
//! Ground truth selection and player spawning.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::index;

use crate::components::{Alive, PlayerId, Role};

/// Draws `num_impostors` distinct players, sorted ascending.
///
/// Asking for more impostors than players draws everyone; the knowledge
/// engine rejects such a round when the model is built.
pub fn draw_impostors(num_agents: usize, num_impostors: usize, rng: &mut SmallRng) -> Vec<usize> {
    let amount = num_impostors.min(num_agents);
    let mut impostors = index::sample(rng, num_agents, amount).into_vec();
    impostors.sort_unstable();
    impostors
}

/// Spawns players `0..num_agents`, all alive.
pub fn spawn_agents(world: &mut World, num_agents: usize, impostors: &[usize]) -> Vec<Entity> {
    let mut spawned_entities = Vec::with_capacity(num_agents);

    for id in 0..num_agents {
        let role = if impostors.contains(&id) {
            Role::Impostor
        } else {
            Role::Crewmate
        };
        let entity = world.spawn((PlayerId(id), role, Alive::new())).id();
        spawned_entities.push(entity);
    }

    spawned_entities
}

/// Living players by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Headcount {
    pub crewmates: usize,
    pub impostors: usize,
}

pub fn headcount(world: &mut World) -> Headcount {
    let mut count = Headcount::default();
    let mut query = world.query::<(&Role, &Alive)>();
    for (role, alive) in query.iter(world) {
        if !alive.is_alive() {
            continue;
        }
        match role {
            Role::Crewmate => count.crewmates += 1,
            Role::Impostor => count.impostors += 1,
        }
    }
    count
}
