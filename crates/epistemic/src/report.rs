//! Knowledge Reports
//!
//! Per-agent query results gathered into one serializable value, so
//! collaborators can log what everybody knows at a decision point.

use serde::{Deserialize, Serialize};

use crate::model::KripkeModel;
use crate::{AgentId, Result};

/// What one agent knows about everybody else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentKnowledge {
    pub agent: AgentId,
    pub known_impostors: Vec<AgentId>,
    pub known_crewmates: Vec<AgentId>,
    /// Agents this one cannot rule out
    pub suspects: Vec<AgentId>,
}

impl AgentKnowledge {
    /// The agent has identified every impostor of the round.
    pub fn has_solved(&self, num_impostors: usize) -> bool {
        self.known_impostors.len() == num_impostors
    }
}

/// Knowledge of a set of agents at the real world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeReport {
    /// Name of the real world
    pub real_world: String,
    pub agents: Vec<AgentKnowledge>,
}

impl KnowledgeReport {
    pub fn agent(&self, agent: AgentId) -> Option<&AgentKnowledge> {
        self.agents.iter().find(|k| k.agent == agent)
    }
}

impl KripkeModel {
    /// Queries what each of `agents` knows.
    pub fn knowledge_report(
        &self,
        agents: impl IntoIterator<Item = AgentId>,
    ) -> Result<KnowledgeReport> {
        let mut entries = Vec::new();
        for agent in agents {
            entries.push(AgentKnowledge {
                agent,
                known_impostors: self.known_impostors(agent)?,
                known_crewmates: self.known_crewmates(agent)?,
                suspects: self.suspected(agent)?,
            });
        }

        Ok(KnowledgeReport {
            real_world: self.real_world().name().to_string(),
            agents: entries,
        })
    }
}
