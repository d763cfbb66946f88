//! Observation System
//!
//! Turns the pending event into private knowledge updates for the agents
//! who witnessed it.

use bevy_ecs::prelude::*;
use std::collections::BTreeMap;

use epistemic::{impostor_atom, not_, AgentId, EpistemicError, Formula};
use game_events::{EventKind, GameEvent};

use super::discussion::MeetingState;
use super::{apply_updates, roster, KnowledgeBase, PendingEvent, RoundFault};
use crate::components::{Alive, Player, PlayerId, Role};

/// System: Consume the pending event and apply what its witnesses learn
pub fn apply_witnessed_events(
    mut pending: ResMut<PendingEvent>,
    mut knowledge: ResMut<KnowledgeBase>,
    mut fault: ResMut<RoundFault>,
    mut meeting: ResMut<MeetingState>,
    mut agents: Query<(&PlayerId, &Role, &mut Alive)>,
) {
    if fault.is_set() {
        return;
    }
    let Some(event) = pending.0.take() else {
        return;
    };

    let players = roster(agents.iter());
    if let Some(unknown) = event.kind.agents().into_iter().find(|a| !players.contains_key(a)) {
        fault.record(EpistemicError::UnknownAgent(unknown));
        return;
    }

    let updates = witnessed_updates(&event, &players);
    tracing::debug!(
        event_id = %event.event_id,
        tick = event.tick,
        kind = event.kind.name(),
        updates = updates.len(),
        "observe"
    );
    apply_updates(&mut knowledge.0, &mut fault, &updates);
    if fault.is_set() {
        return;
    }

    let mut leaving = Vec::new();
    match &event.kind {
        EventKind::Kill { victim, .. } => leaving.push(*victim),
        EventKind::Ejection { agent } => leaving.push(*agent),
        EventKind::BodyReported { victim, .. } => {
            leaving.push(*victim);
            meeting.call(&event);
            meeting.bodies.push(*victim);
        }
        EventKind::EmergencyMeeting { .. } => meeting.call(&event),
        _ => {}
    }

    for (id, _, mut alive) in agents.iter_mut() {
        if leaving.contains(&id.0) && alive.is_alive() {
            alive.0 = false;
            tracing::debug!(agent = id.0, "agent leaves play");
        }
    }
}

/// Updates implied by one event: who learns what.
///
/// Only living crewmates learn. A kill tells its witnesses the killer's
/// role and a visual task clears its performer; other events carry no
/// private information except explicit observations.
pub fn witnessed_updates(
    event: &GameEvent,
    players: &BTreeMap<AgentId, Player>,
) -> Vec<(AgentId, Formula)> {
    let learns = |agent: &AgentId| players.get(agent).is_some_and(|p| p.is_living_crewmate());

    match &event.kind {
        EventKind::Kill {
            killer,
            victim,
            witnesses,
        } => witnesses
            .iter()
            .filter(|w| *w != killer && *w != victim && learns(*w))
            .map(|w| (*w, impostor_atom(*killer)))
            .collect(),
        EventKind::VisualTask { agent, witnesses } => witnesses
            .iter()
            .filter(|w| *w != agent && learns(*w))
            .map(|w| (*w, not_(impostor_atom(*agent))))
            .collect(),
        EventKind::Observation { observer, formula } => {
            if players.get(observer).is_some_and(|p| p.alive) {
                vec![(*observer, formula.clone())]
            } else {
                Vec::new()
            }
        }
        EventKind::Task { .. }
        | EventKind::BodyReported { .. }
        | EventKind::EmergencyMeeting { .. }
        | EventKind::Ejection { .. } => Vec::new(),
    }
}
