//! Kripke Model
//!
//! The model owned by the simulation for one round, and the recursive
//! evaluator that decides formulas against it.

use std::collections::{BTreeMap, VecDeque};

use crate::builder::ModelParams;
use crate::error::EpistemicError;
use crate::formula::Formula;
use crate::world::{Relation, World, WorldIndex};
use crate::{AgentId, Result};

/// Kripke structure: worlds, one relation per agent, and the real world.
///
/// World contents are read-only once built. Relations change only through
/// [`KripkeModel::update`].
#[derive(Debug, Clone)]
pub struct KripkeModel {
    pub(crate) params: ModelParams,
    pub(crate) worlds: Vec<World>,
    pub(crate) relations: BTreeMap<AgentId, Relation>,
    pub(crate) real_world: WorldIndex,
}

impl KripkeModel {
    /// Parameters this model was built from
    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn num_agents(&self) -> usize {
        self.params.num_agents
    }

    /// All agent ids, in ascending order
    pub fn agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.relations.keys().copied()
    }

    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    pub fn world(&self, index: WorldIndex) -> Option<&World> {
        self.worlds.get(index)
    }

    pub fn world_index(&self, name: &str) -> Option<WorldIndex> {
        self.worlds.iter().position(|w| w.name() == name)
    }

    /// The world that reflects ground truth for this round
    pub fn real_world(&self) -> &World {
        &self.worlds[self.real_world]
    }

    pub fn real_world_index(&self) -> WorldIndex {
        self.real_world
    }

    /// Accessibility relation of `agent`.
    pub fn relation(&self, agent: AgentId) -> Result<&Relation> {
        self.relations
            .get(&agent)
            .ok_or(EpistemicError::UnknownAgent(agent))
    }

    pub(crate) fn relation_mut(&mut self, agent: AgentId) -> Result<&mut Relation> {
        self.relations
            .get_mut(&agent)
            .ok_or(EpistemicError::UnknownAgent(agent))
    }

    /// Evaluates `formula` at the real world.
    pub fn evaluate(&self, formula: &Formula) -> Result<bool> {
        self.eval(formula, self.real_world)
    }

    /// Evaluates `formula` at an arbitrary world.
    pub fn evaluate_at(&self, formula: &Formula, world: WorldIndex) -> Result<bool> {
        if world >= self.worlds.len() {
            return Err(EpistemicError::invalid(format!(
                "world index {} out of range ({} worlds)",
                world,
                self.worlds.len()
            )));
        }
        self.eval(formula, world)
    }

    /// Worlds at which `formula` is false.
    pub fn falsifying_worlds(&self, formula: &Formula) -> Result<Vec<WorldIndex>> {
        let mut falsified = Vec::new();
        for world in 0..self.worlds.len() {
            if !self.eval(formula, world)? {
                falsified.push(world);
            }
        }
        Ok(falsified)
    }

    /// True when every relation is symmetric, reflexive on the worlds its
    /// agent has not ruled out, and keeps the real world's loop.
    pub fn is_well_formed(&self) -> bool {
        self.relations.values().all(|r| {
            r.is_symmetric()
                && r.is_reflexive_where_live(self.worlds.len())
                && r.contains(self.real_world, self.real_world)
        })
    }

    fn eval(&self, formula: &Formula, world: WorldIndex) -> Result<bool> {
        match formula {
            Formula::Atom(name) => self.worlds[world]
                .value(name)
                .ok_or_else(|| EpistemicError::UnknownProposition(name.clone())),
            Formula::Not(inner) => Ok(!self.eval(inner, world)?),
            Formula::And(lhs, rhs) => Ok(self.eval(lhs, world)? && self.eval(rhs, world)?),
            Formula::Or(lhs, rhs) => Ok(self.eval(lhs, world)? || self.eval(rhs, world)?),
            Formula::Know(agent, inner) => {
                let relation = self.relation(*agent)?;
                for successor in relation.successors(world) {
                    if !self.eval(inner, successor)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Formula::CommonKnow(inner) => self.eval_common(inner, world),
        }
    }

    /// Checks `inner` on the reflexive-transitive closure of the union of
    /// all relations, starting at `world`.
    fn eval_common(&self, inner: &Formula, world: WorldIndex) -> Result<bool> {
        let mut visited = vec![false; self.worlds.len()];
        let mut queue = VecDeque::from([world]);
        visited[world] = true;

        while let Some(current) = queue.pop_front() {
            if !self.eval(inner, current)? {
                return Ok(false);
            }
            for relation in self.relations.values() {
                for next in relation.successors(current) {
                    if !visited[next] {
                        visited[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        Ok(true)
    }
}
