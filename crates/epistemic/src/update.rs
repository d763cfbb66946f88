//! Private Belief Revision
//!
//! An agent that privately learns a fact cuts every pair of its own
//! relation touching a world where the fact fails, loops included. Such a
//! world is left with no successors, so anything the agent "knows" there
//! holds vacuously. Worlds are never deleted and other agents' relations
//! are left alone, so the update is invisible to everyone else.

use std::collections::BTreeSet;

use crate::error::EpistemicError;
use crate::formula::{impostor_atom, not_, Formula};
use crate::model::KripkeModel;
use crate::world::WorldIndex;
use crate::{AgentId, Result};

/// What a single update changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// Pairs removed from the agent's relation
    pub removed_pairs: usize,
    /// Worlds at which the learned formula is false
    pub inconsistent_worlds: Vec<WorldIndex>,
    /// The agent can no longer reach any world but the real one
    pub resolved: bool,
}

impl KripkeModel {
    /// Records that `agent` now privately knows `formula` to be true.
    ///
    /// Every pair of the agent's relation that touches a world falsifying
    /// `formula` is removed. A formula that is false at the real world is
    /// rejected and the model is left unchanged, so the real world always
    /// keeps its loop.
    pub fn update(&mut self, agent: AgentId, formula: &Formula) -> Result<UpdateOutcome> {
        self.relation(agent)?;

        let inconsistent = self.falsifying_worlds(formula)?;
        if inconsistent.contains(&self.real_world) {
            return Err(EpistemicError::ContradictsRealWorld {
                agent,
                formula: formula.to_string(),
            });
        }

        let pruned: BTreeSet<WorldIndex> = inconsistent.iter().copied().collect();
        let relation = self.relation_mut(agent)?;
        let removed_pairs =
            relation.retain(|from, to| !(pruned.contains(&from) || pruned.contains(&to)));

        let real_world = self.real_world;
        let resolved = self
            .relation(agent)?
            .successors(real_world)
            .all(|w| w == real_world);

        tracing::debug!(
            "Agent {} learned {}: removed {} pairs over {} worlds{}",
            agent,
            formula,
            removed_pairs,
            inconsistent.len(),
            if resolved { " (resolved)" } else { "" }
        );

        Ok(UpdateOutcome {
            removed_pairs,
            inconsistent_worlds: inconsistent,
            resolved,
        })
    }

    /// `observer` caught `impostor` in the act.
    pub fn update_known_impostor(
        &mut self,
        observer: AgentId,
        impostor: AgentId,
    ) -> Result<UpdateOutcome> {
        self.update(observer, &impostor_atom(impostor))
    }

    /// `observer` saw `crewmate` do something only a crewmate can do.
    pub fn update_known_crewmate(
        &mut self,
        observer: AgentId,
        crewmate: AgentId,
    ) -> Result<UpdateOutcome> {
        self.update(observer, &not_(impostor_atom(crewmate)))
    }
}
