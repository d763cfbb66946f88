//! Discussion Systems
//!
//! Runs when a meeting has been called: everyone learns the victims were
//! innocent, crewmates broadcast their knowledge summaries to whoever
//! trusts them, and the outcome is recorded.

use bevy_ecs::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use epistemic::{impostor_atom, not_, AgentId, KripkeModel};
use game_events::GameEvent;

use super::{apply_updates, roster, KnowledgeBase, RoundFault};
use crate::components::{Alive, Player, PlayerId, Role};
use crate::config::{DiscussionConfig, TrustPolicy};
use crate::output::{MeetingLog, MeetingReport, ReportWriter, TrustEdge};

/// Resource: discussion settings for the round
#[derive(Resource, Debug, Clone, Default)]
pub struct DiscussionSettings(pub DiscussionConfig);

/// Who called the current meeting and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingCall {
    pub tick: u64,
    pub trigger: &'static str,
}

/// Resource: state of the meeting in progress
#[derive(Resource, Debug, Default)]
pub struct MeetingState {
    called: Option<MeetingCall>,
    /// Victims reported for this meeting
    pub bodies: Vec<AgentId>,
    /// Broadcasts accepted so far
    pub trust: BTreeSet<TrustEdge>,
    held: u32,
}

impl MeetingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a meeting for `event`; a second call before the meeting
    /// closes keeps the first trigger.
    pub fn call(&mut self, event: &GameEvent) {
        if self.called.is_none() {
            self.called = Some(MeetingCall {
                tick: event.tick,
                trigger: event.kind.name(),
            });
        }
    }

    pub fn is_called(&self) -> bool {
        self.called.is_some()
    }

    /// Meetings closed so far
    pub fn held(&self) -> u32 {
        self.held
    }

    /// Ends the meeting, returning its number and call.
    pub fn close(&mut self) -> Option<(u32, MeetingCall)> {
        let call = self.called.take()?;
        self.held += 1;
        self.bodies.clear();
        Some((self.held, call))
    }
}

/// System: Every living crewmate learns the reported victims were innocent
pub fn learn_from_bodies(
    mut meeting: ResMut<MeetingState>,
    mut knowledge: ResMut<KnowledgeBase>,
    mut fault: ResMut<RoundFault>,
    agents: Query<(&PlayerId, &Role, &Alive)>,
) {
    if fault.is_set() || !meeting.is_called() || meeting.bodies.is_empty() {
        return;
    }

    let bodies = std::mem::take(&mut meeting.bodies);
    let players = roster(agents.iter());
    let updates: Vec<_> = players
        .values()
        .filter(|p| p.is_living_crewmate())
        .flat_map(|p| {
            bodies
                .iter()
                .filter(move |victim| **victim != p.id)
                .map(move |victim| (p.id, not_(impostor_atom(*victim))))
        })
        .collect();

    tracing::debug!(bodies = ?bodies, updates = updates.len(), "victims cleared");
    apply_updates(&mut knowledge.0, &mut fault, &updates);
}

/// System: Living crewmates broadcast what they know
///
/// Impostors stay silent. Rounds repeat until nobody learns anything or
/// `max_rounds` is reached.
pub fn share_knowledge(
    settings: Res<DiscussionSettings>,
    mut meeting: ResMut<MeetingState>,
    mut knowledge: ResMut<KnowledgeBase>,
    mut fault: ResMut<RoundFault>,
    agents: Query<(&PlayerId, &Role, &Alive)>,
) {
    if fault.is_set() || !meeting.is_called() || !settings.0.share_knowledge {
        return;
    }

    let crew = living_crewmates(&roster(agents.iter()));
    for round in 1..=settings.0.max_rounds {
        match broadcast_round(
            &mut knowledge.0,
            &crew,
            settings.0.trust_policy,
            &mut meeting.trust,
        ) {
            Ok(0) => {
                tracing::debug!(round, "discussion settled");
                break;
            }
            Ok(removed) => tracing::debug!(round, removed, "broadcast round"),
            Err(e) => {
                fault.record(e);
                return;
            }
        }
    }
}

/// One round of broadcasts among `crew`.
///
/// Every summary is taken before any is applied. Returns the number of
/// accessibility pairs removed across all receivers.
pub fn broadcast_round(
    model: &mut KripkeModel,
    crew: &[AgentId],
    policy: TrustPolicy,
    trust: &mut BTreeSet<TrustEdge>,
) -> epistemic::Result<usize> {
    let summaries = crew
        .iter()
        .map(|&speaker| Ok((speaker, model.summarize_knowledge(speaker)?)))
        .collect::<epistemic::Result<Vec<_>>>()?;

    let mut removed = 0;
    for &receiver in crew {
        for (speaker, summary) in &summaries {
            if *speaker == receiver {
                continue;
            }
            let trusted = match policy {
                TrustPolicy::Everyone => true,
                TrustPolicy::KnownCrewmates => model.knows_crewmate(receiver, *speaker)?,
            };
            if !trusted {
                continue;
            }

            let edge = TrustEdge {
                receiver,
                speaker: *speaker,
            };
            if trust.insert(edge) {
                tracing::debug!("{} trusts {}", receiver, speaker);
            }
            removed += model.update(receiver, summary)?.removed_pairs;
        }
    }
    Ok(removed)
}

/// System: Record what everyone knows as the meeting closes
pub fn record_knowledge(
    mut meeting: ResMut<MeetingState>,
    knowledge: Res<KnowledgeBase>,
    mut fault: ResMut<RoundFault>,
    mut log: ResMut<MeetingLog>,
    mut writer: ResMut<ReportWriter>,
    agents: Query<(&PlayerId, &Role, &Alive)>,
) {
    if fault.is_set() {
        return;
    }
    let Some((number, call)) = meeting.close() else {
        return;
    };

    let trust: Vec<TrustEdge> = std::mem::take(&mut meeting.trust).into_iter().collect();
    let players = roster(agents.iter());
    let report = match knowledge_snapshot(&knowledge.0, &players, number, call, trust) {
        Ok(report) => report,
        Err(e) => {
            fault.record(e);
            return;
        }
    };

    let solved = report
        .report
        .agents
        .iter()
        .filter(|k| k.has_solved(knowledge.0.params().num_impostors))
        .count();
    tracing::info!(
        meeting = report.meeting,
        tick = report.tick,
        trigger = %report.trigger,
        solved,
        "meeting closed"
    );

    if let Err(e) = writer.write(&report).and_then(|()| writer.flush()) {
        fault.record(e);
    }
    log.push(report);
}

/// Builds the report for meeting `number` from the current model.
pub fn knowledge_snapshot(
    model: &KripkeModel,
    players: &BTreeMap<AgentId, Player>,
    number: u32,
    call: MeetingCall,
    trust: Vec<TrustEdge>,
) -> epistemic::Result<MeetingReport> {
    Ok(MeetingReport {
        meeting: number,
        tick: call.tick,
        trigger: call.trigger.to_string(),
        alive: players.values().filter(|p| p.alive).map(|p| p.id).collect(),
        report: model.knowledge_report(players.keys().copied())?,
        trust,
    })
}

fn living_crewmates(players: &BTreeMap<AgentId, Player>) -> Vec<AgentId> {
    players
        .values()
        .filter(|p| p.is_living_crewmate())
        .map(|p| p.id)
        .collect()
}
