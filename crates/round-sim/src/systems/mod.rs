//! Round Systems
//!
//! Observe: route the pending event to knowledge updates.
//! Discuss: victims are cleared, crewmates share what they know, and a
//! report is recorded.

pub mod discussion;
pub mod observation;

use bevy_ecs::prelude::*;
use std::collections::BTreeMap;

use epistemic::{AgentId, Formula, KripkeModel};
use game_events::GameEvent;

use crate::components::{Alive, Player, PlayerId, Role};
use crate::runner::RoundError;

pub use discussion::{
    learn_from_bodies, record_knowledge, share_knowledge, DiscussionSettings, MeetingState,
};
pub use observation::apply_witnessed_events;

/// Resource: the round's knowledge model
#[derive(Resource, Debug)]
pub struct KnowledgeBase(pub KripkeModel);

/// Resource: the event the observe schedule will consume next
#[derive(Resource, Debug, Default)]
pub struct PendingEvent(pub Option<GameEvent>);

/// Resource: first failure raised inside a system.
///
/// Systems do nothing while a fault is set; the runner surfaces it after
/// the schedule returns.
#[derive(Resource, Debug, Default)]
pub struct RoundFault(Option<RoundError>);

impl RoundFault {
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Keeps the first error, later ones are dropped
    pub fn record(&mut self, error: impl Into<RoundError>) {
        if self.0.is_none() {
            let error = error.into();
            tracing::error!("round stopped: {}", error);
            self.0 = Some(error);
        }
    }

    pub fn take(&mut self) -> Option<RoundError> {
        self.0.take()
    }
}

/// Players by id.
pub(crate) fn roster<'a>(
    agents: impl Iterator<Item = (&'a PlayerId, &'a Role, &'a Alive)>,
) -> BTreeMap<AgentId, Player> {
    agents
        .map(|(id, role, alive)| {
            (
                id.0,
                Player {
                    id: id.0,
                    role: *role,
                    alive: alive.is_alive(),
                },
            )
        })
        .collect()
}

/// Applies each update in order, stopping at the first failure.
///
/// Returns the number of accessibility pairs removed.
pub(crate) fn apply_updates(
    model: &mut KripkeModel,
    fault: &mut RoundFault,
    updates: &[(AgentId, Formula)],
) -> usize {
    let mut removed = 0;
    for (agent, formula) in updates {
        match model.update(*agent, formula) {
            Ok(outcome) => removed += outcome.removed_pairs,
            Err(e) => {
                fault.record(e);
                break;
            }
        }
    }
    removed
}
