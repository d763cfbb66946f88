//! Model Builder
//!
//! Builds the initial Kripke structure of a round: one world per possible
//! impostor subset, and relations encoding that every agent knows whether
//! it is an impostor itself.

use std::collections::BTreeMap;

use crate::error::EpistemicError;
use crate::model::KripkeModel;
use crate::world::{Relation, World, WorldIndex};
use crate::{AgentId, Result};

/// Default cap on the number of worlds a model may contain.
///
/// Relations grow quadratically with the world count.
pub const DEFAULT_MAX_WORLDS: usize = 4096;

/// Parameters of a round's model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelParams {
    pub num_agents: usize,
    pub num_impostors: usize,
    /// Ground-truth impostors for the round
    pub impostors: Vec<AgentId>,
    /// Upper bound on `C(num_agents, num_impostors)`
    pub max_worlds: usize,
}

impl ModelParams {
    pub fn new(num_agents: usize, num_impostors: usize, impostors: &[AgentId]) -> Self {
        let mut impostors = impostors.to_vec();
        impostors.sort_unstable();
        Self {
            num_agents,
            num_impostors,
            impostors,
            max_worlds: DEFAULT_MAX_WORLDS,
        }
    }

    pub fn with_max_worlds(mut self, max_worlds: usize) -> Self {
        self.max_worlds = max_worlds;
        self
    }

    /// Number of worlds the model will contain, `None` on overflow
    pub fn world_count(&self) -> Option<usize> {
        binomial(self.num_agents, self.num_impostors)
    }

    /// Checks counts, ground truth and model size.
    pub fn validate(&self) -> Result<()> {
        if self.num_impostors < 1 {
            return Err(EpistemicError::invalid("a round needs at least one impostor"));
        }
        if self.num_impostors >= self.num_agents {
            return Err(EpistemicError::invalid(format!(
                "{} impostors leave no crewmates among {} agents",
                self.num_impostors, self.num_agents
            )));
        }
        if self.impostors.len() != self.num_impostors {
            return Err(EpistemicError::invalid(format!(
                "ground truth lists {} impostors, expected {}",
                self.impostors.len(),
                self.num_impostors
            )));
        }
        if let Some(&agent) = self.impostors.iter().find(|&&a| a >= self.num_agents) {
            return Err(EpistemicError::invalid(format!(
                "ground-truth impostor {} is not one of the {} agents",
                agent, self.num_agents
            )));
        }
        let mut distinct = self.impostors.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() != self.impostors.len() {
            return Err(EpistemicError::invalid("ground truth lists an impostor twice"));
        }
        match self.world_count() {
            Some(count) if count <= self.max_worlds => Ok(()),
            _ => Err(EpistemicError::invalid(format!(
                "C({}, {}) worlds exceed the limit of {}",
                self.num_agents, self.num_impostors, self.max_worlds
            ))),
        }
    }
}

/// `n` choose `k`, or `None` if it does not fit in a `usize`.
pub fn binomial(n: usize, k: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // Exact at every step: result * (n - i) is divisible by (i + 1)
        result = result.checked_mul((n - i) as u128)? / (i as u128 + 1);
    }
    usize::try_from(result).ok()
}

/// Builds the model for `num_agents` agents of which `impostors` are the
/// real impostors.
pub fn build(num_agents: usize, num_impostors: usize, impostors: &[AgentId]) -> Result<KripkeModel> {
    KripkeModel::build(ModelParams::new(num_agents, num_impostors, impostors))
}

/// All `k`-element subsets of `0..n`, in lexicographic order.
fn impostor_subsets(n: usize, k: usize) -> Vec<Vec<AgentId>> {
    let mut subsets = Vec::new();
    let mut current: Vec<AgentId> = (0..k).collect();
    loop {
        subsets.push(current.clone());
        // Rightmost position that can still advance
        let Some(i) = (0..k).rev().find(|&i| current[i] != i + n - k) else {
            break;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
    subsets
}

impl KripkeModel {
    /// Builds the initial model of a round.
    ///
    /// An agent's relation links every pair of worlds in which that agent
    /// is innocent; worlds where it is guilty only see themselves.
    pub fn build(params: ModelParams) -> Result<Self> {
        params.validate()?;
        let n = params.num_agents;

        let worlds: Vec<World> = impostor_subsets(n, params.num_impostors)
            .into_iter()
            .map(|subset| World::with_impostors(n, subset))
            .collect();

        let mut relations = BTreeMap::new();
        for agent in 0..n {
            let innocent: Vec<WorldIndex> = worlds
                .iter()
                .enumerate()
                .filter(|(_, w)| !w.has_impostor(agent))
                .map(|(index, _)| index)
                .collect();

            let mut relation = Relation::new();
            for &from in &innocent {
                for &to in &innocent {
                    relation.insert(from, to);
                }
            }
            relation.close_symmetric();
            relation.add_reflexive(worlds.len());
            relations.insert(agent, relation);
        }

        let mut truth = params.impostors.clone();
        truth.sort_unstable();
        let real_world = worlds
            .iter()
            .position(|w| w.impostors() == truth.as_slice())
            .ok_or_else(|| EpistemicError::invalid("ground truth matches no world"))?;

        tracing::debug!(
            "Built model: {} agents, {} impostors, {} worlds, real world {}",
            n,
            params.num_impostors,
            worlds.len(),
            worlds[real_world].name()
        );

        Ok(Self {
            params,
            worlds,
            relations,
            real_world,
        })
    }

    /// Rebuilds the model in place from its original parameters,
    /// discarding everything learned this round.
    pub fn reset(&mut self) -> Result<()> {
        *self = Self::build(self.params.clone())?;
        Ok(())
    }
}
