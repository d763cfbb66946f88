//! Worlds and Accessibility Relations
//!
//! A world is one complete hypothesis about who the impostors are. A
//! relation records, for a single agent, which worlds that agent cannot
//! tell apart.

use std::collections::{BTreeMap, BTreeSet};

use crate::formula::impostor_proposition;
use crate::AgentId;

/// Position of a world in the model's world list
pub type WorldIndex = usize;

/// A possible world: a total truth assignment over the round's propositions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    name: String,
    /// Sorted impostor subset this world stands for
    impostors: Vec<AgentId>,
    assignment: BTreeMap<String, bool>,
}

impl World {
    /// Creates the world in which exactly `impostors` are impostors.
    pub(crate) fn with_impostors(num_agents: usize, mut impostors: Vec<AgentId>) -> Self {
        impostors.sort_unstable();
        let assignment = (0..num_agents)
            .map(|agent| (impostor_proposition(agent), impostors.contains(&agent)))
            .collect();

        Self {
            name: world_name(&impostors),
            impostors,
            assignment,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Impostors in this world, in ascending order
    pub fn impostors(&self) -> &[AgentId] {
        &self.impostors
    }

    pub fn has_impostor(&self, agent: AgentId) -> bool {
        self.impostors.binary_search(&agent).is_ok()
    }

    /// Truth value of a proposition, or `None` if it is not part of the vocabulary
    pub fn value(&self, proposition: &str) -> Option<bool> {
        self.assignment.get(proposition).copied()
    }

    pub fn assignment(&self) -> &BTreeMap<String, bool> {
        &self.assignment
    }

    /// Number of propositions true in this world
    pub fn true_count(&self) -> usize {
        self.assignment.values().filter(|v| **v).count()
    }
}

/// Deterministic world name for a sorted impostor subset: `Imp2`, `Imp0_3`, ...
pub fn world_name(impostors: &[AgentId]) -> String {
    let ids: Vec<String> = impostors.iter().map(|id| id.to_string()).collect();
    format!("Imp{}", ids.join("_"))
}

/// One agent's indistinguishability relation over world indices.
///
/// Pairs are kept in an ordered set so the successors of a world form a
/// contiguous range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relation {
    pairs: BTreeSet<(WorldIndex, WorldIndex)>,
}

impl Relation {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, from: WorldIndex, to: WorldIndex) -> bool {
        self.pairs.insert((from, to))
    }

    pub fn contains(&self, from: WorldIndex, to: WorldIndex) -> bool {
        self.pairs.contains(&(from, to))
    }

    /// Worlds the agent cannot distinguish from `from`
    pub fn successors(&self, from: WorldIndex) -> impl Iterator<Item = WorldIndex> + '_ {
        self.pairs
            .range((from, WorldIndex::MIN)..=(from, WorldIndex::MAX))
            .map(|&(_, to)| to)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (WorldIndex, WorldIndex)> + '_ {
        self.pairs.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Adds `(w2, w1)` for every `(w1, w2)`.
    pub(crate) fn close_symmetric(&mut self) {
        let mirrored: Vec<_> = self.pairs.iter().map(|&(a, b)| (b, a)).collect();
        self.pairs.extend(mirrored);
    }

    /// Adds `(w, w)` for every world in the model.
    pub(crate) fn add_reflexive(&mut self, world_count: usize) {
        self.pairs.extend((0..world_count).map(|w| (w, w)));
    }

    /// Keeps only the pairs matching `keep`, returning how many were removed.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(WorldIndex, WorldIndex) -> bool) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|&(a, b)| keep(a, b));
        before - self.pairs.len()
    }

    pub fn is_reflexive(&self, world_count: usize) -> bool {
        (0..world_count).all(|w| self.contains(w, w))
    }

    /// The agent has not ruled `world` out: it still has a successor.
    pub fn is_live(&self, world: WorldIndex) -> bool {
        self.successors(world).next().is_some()
    }

    /// Reflexive on every live world; ruled-out worlds have no pairs at all.
    pub fn is_reflexive_where_live(&self, world_count: usize) -> bool {
        (0..world_count).all(|w| !self.is_live(w) || self.contains(w, w))
    }

    pub fn is_symmetric(&self) -> bool {
        self.pairs.iter().all(|&(a, b)| self.contains(b, a))
    }
}
