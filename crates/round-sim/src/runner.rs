//! Round Runner
//!
//! Replays a scripted round event by event. Each event passes through the
//! round phases: observe always runs, and discuss runs whenever observe
//! turned up a body or an emergency call.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use epistemic::{AgentId, EpistemicError, KripkeModel, ModelParams};
use game_events::{GameEvent, Phase, ScriptError};

use crate::components::{Alive, PlayerId, Role};
use crate::config::{ConfigError, RoundConfig};
use crate::output::{MeetingLog, MeetingReport, ReportWriter, FINAL_TRIGGER};
use crate::setup::{draw_impostors, headcount, spawn_agents, Headcount};
use crate::systems::discussion::{knowledge_snapshot, MeetingCall};
use crate::systems::{
    apply_witnessed_events, learn_from_bodies, record_knowledge, roster, share_knowledge,
    DiscussionSettings, KnowledgeBase, MeetingState, PendingEvent, RoundFault,
};

#[derive(Debug, Error)]
pub enum RoundError {
    #[error("knowledge engine: {0}")]
    Engine(#[from] EpistemicError),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("event script: {0}")]
    Script(#[from] ScriptError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which side has won, judged on living players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Undecided,
    /// Every impostor is dead or ejected
    CrewmatesWin,
    /// Impostors match or outnumber the living crewmates
    ImpostorsWin,
}

impl Outcome {
    pub fn judge(count: Headcount) -> Self {
        if count.impostors == 0 {
            Outcome::CrewmatesWin
        } else if count.impostors >= count.crewmates {
            Outcome::ImpostorsWin
        } else {
            Outcome::Undecided
        }
    }
}

/// Result of replaying a whole script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub real_world: String,
    pub impostors: Vec<AgentId>,
    pub events_applied: usize,
    pub meetings: u32,
    pub outcome: Outcome,
    /// Knowledge after the last event
    pub final_report: MeetingReport,
}

pub struct RoundRunner {
    world: World,
    observe: Schedule,
    discuss: Schedule,
    events_applied: usize,
    last_tick: u64,
}

impl RoundRunner {
    /// Builds the model and spawns the players.
    ///
    /// Impostors come from `game.impostors`, or are drawn from `game.seed`
    /// when that list is empty. Reports are discarded until a writer is
    /// attached with [`RoundRunner::with_writer`].
    pub fn new(config: &RoundConfig) -> Result<Self, RoundError> {
        let game = &config.game;
        let impostors = if game.impostors.is_empty() {
            let mut rng = SmallRng::seed_from_u64(game.seed);
            draw_impostors(game.num_agents, game.num_impostors, &mut rng)
        } else {
            game.impostors.clone()
        };

        let params = ModelParams::new(game.num_agents, game.num_impostors, &impostors)
            .with_max_worlds(config.engine.max_worlds);
        let model = KripkeModel::build(params)?;

        let mut world = World::new();
        spawn_agents(&mut world, game.num_agents, model.real_world().impostors());
        tracing::info!(
            agents = game.num_agents,
            impostors = ?model.real_world().impostors(),
            worlds = model.worlds().len(),
            "round ready"
        );

        world.insert_resource(KnowledgeBase(model));
        world.insert_resource(PendingEvent::default());
        world.insert_resource(RoundFault::default());
        world.insert_resource(MeetingState::new());
        world.insert_resource(MeetingLog::new());
        world.insert_resource(ReportWriter::null());
        world.insert_resource(DiscussionSettings(config.discussion.clone()));

        let mut observe = Schedule::default();
        observe.add_systems(apply_witnessed_events);

        let mut discuss = Schedule::default();
        discuss.add_systems((learn_from_bodies, share_knowledge, record_knowledge).chain());

        Ok(Self {
            world,
            observe,
            discuss,
            events_applied: 0,
            last_tick: 0,
        })
    }

    /// Sends meeting reports to `writer`.
    pub fn with_writer(mut self, writer: ReportWriter) -> Self {
        self.world.insert_resource(writer);
        self
    }

    /// Replays one event through observe and, if a meeting was called,
    /// discuss.
    ///
    /// On error the updates applied before the failing one are kept.
    pub fn step(&mut self, event: GameEvent) -> Result<Outcome, RoundError> {
        self.last_tick = event.tick;
        self.world.resource_mut::<PendingEvent>().0 = Some(event);

        let mut phase = Phase::Act.next(false);
        while phase != Phase::Act {
            match phase {
                Phase::Observe => self.observe.run(&mut self.world),
                Phase::Discuss => self.discuss.run(&mut self.world),
                // Votes arrive in the script as ejections
                Phase::Vote | Phase::Check | Phase::Act => {}
            }
            self.check_fault()?;
            tracing::trace!(%phase, "phase complete");

            let meeting = self.world.resource::<MeetingState>().is_called();
            phase = phase.next(meeting);
        }

        self.events_applied += 1;
        Ok(self.outcome())
    }

    /// Replays every event, then records a final report.
    pub fn run(
        &mut self,
        events: impl IntoIterator<Item = GameEvent>,
    ) -> Result<RoundSummary, RoundError> {
        let mut outcome = self.outcome();
        for event in events {
            let next = self.step(event)?;
            if next != outcome {
                tracing::info!(?next, tick = self.last_tick, "round outcome changed");
                outcome = next;
            }
        }

        let final_report = self.record_final()?;
        let model = self.model();
        Ok(RoundSummary {
            real_world: model.real_world().name().to_string(),
            impostors: model.real_world().impostors().to_vec(),
            events_applied: self.events_applied,
            meetings: self.world.resource::<MeetingState>().held(),
            outcome,
            final_report,
        })
    }

    pub fn model(&self) -> &KripkeModel {
        &self.world.resource::<KnowledgeBase>().0
    }

    pub fn impostors(&self) -> &[AgentId] {
        self.model().real_world().impostors()
    }

    /// Reports recorded so far, in order
    pub fn reports(&self) -> &[MeetingReport] {
        self.world.resource::<MeetingLog>().reports()
    }

    pub fn is_alive(&mut self, agent: AgentId) -> Option<bool> {
        let mut query = self.world.query::<(&PlayerId, &Alive)>();
        query
            .iter(&self.world)
            .find(|(id, _)| id.0 == agent)
            .map(|(_, alive)| alive.is_alive())
    }

    pub fn outcome(&mut self) -> Outcome {
        Outcome::judge(headcount(&mut self.world))
    }

    fn check_fault(&mut self) -> Result<(), RoundError> {
        match self.world.resource_mut::<RoundFault>().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn record_final(&mut self) -> Result<MeetingReport, RoundError> {
        let players = {
            let mut query = self.world.query::<(&PlayerId, &Role, &Alive)>();
            roster(query.iter(&self.world))
        };
        let number = self.world.resource::<MeetingState>().held() + 1;
        let call = MeetingCall {
            tick: self.last_tick,
            trigger: FINAL_TRIGGER,
        };
        let report = knowledge_snapshot(self.model(), &players, number, call, Vec::new())?;

        {
            let mut writer = self.world.resource_mut::<ReportWriter>();
            writer.write(&report)?;
            writer.flush()?;
        }
        self.world.resource_mut::<MeetingLog>().push(report.clone());
        Ok(report)
    }
}
