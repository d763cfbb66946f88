//! Agent Components
//!
//! Players are entities carrying their id, hidden role and liveness.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Player number, also the agent index in the knowledge model
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

/// Hidden role, fixed for the round
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Crewmate,
    Impostor,
}

impl Role {
    pub fn is_impostor(self) -> bool {
        self == Role::Impostor
    }
}

/// Whether the player is still in play
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alive(pub bool);

impl Alive {
    pub fn new() -> Self {
        Self(true)
    }

    pub fn is_alive(&self) -> bool {
        self.0
    }
}

impl Default for Alive {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of one player, for systems that need to look others up by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub id: usize,
    pub role: Role,
    pub alive: bool,
}

impl Player {
    /// A living crewmate is the only kind of player who learns from events.
    pub fn is_living_crewmate(&self) -> bool {
        self.alive && !self.role.is_impostor()
    }
}
