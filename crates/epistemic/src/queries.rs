//! Knowledge Queries
//!
//! Thin formula constructions evaluated at the real world, plus the
//! knowledge summary a crewmate broadcasts during discussion.

use crate::formula::{conjunction, impostor_atom, know, not_, or_, Formula};
use crate::model::KripkeModel;
use crate::{AgentId, Result};

impl KripkeModel {
    /// `observer` cannot rule out that `other` is an impostor.
    pub fn suspects(&self, observer: AgentId, other: AgentId) -> Result<bool> {
        self.evaluate(&not_(know(observer, not_(impostor_atom(other)))))
    }

    pub fn knows_impostor(&self, observer: AgentId, other: AgentId) -> Result<bool> {
        self.evaluate(&know(observer, impostor_atom(other)))
    }

    pub fn knows_crewmate(&self, observer: AgentId, other: AgentId) -> Result<bool> {
        self.evaluate(&know(observer, not_(impostor_atom(other))))
    }

    /// `b` knows that `a` knows `other` is an impostor.
    ///
    /// Lets an impostor (`b`) judge how close crewmate `a` is to the truth.
    pub fn knows_that_knows(&self, a: AgentId, b: AgentId, other: AgentId) -> Result<bool> {
        self.evaluate(&know(b, know(a, impostor_atom(other))))
    }

    /// Builds the formula `observer` broadcasts to share what it knows.
    ///
    /// The result is `K_observer(C_1 ∧ C_2 ∧ ...)` over every other agent,
    /// where each conjunct states innocence, guilt, or the tautology
    /// `IsImpostor:j ∨ ¬IsImpostor:j` when the observer is unsure. The
    /// tautology keeps every summary the same shape, so a receiver cannot
    /// read uncertainty off the formula's structure.
    pub fn summarize_knowledge(&self, observer: AgentId) -> Result<Formula> {
        self.relation(observer)?;

        let mut conjuncts = Vec::new();
        for other in self.agents().filter(|&a| a != observer) {
            let conjunct = if self.knows_crewmate(observer, other)? {
                not_(impostor_atom(other))
            } else if self.knows_impostor(observer, other)? {
                impostor_atom(other)
            } else {
                or_(impostor_atom(other), not_(impostor_atom(other)))
            };
            conjuncts.push(conjunct);
        }

        // Models always hold at least two agents, but fall back to a tautology
        let body = conjunction(conjuncts).unwrap_or_else(|| {
            let own = impostor_atom(observer);
            or_(own.clone(), not_(own))
        });
        Ok(know(observer, body))
    }

    /// Agents `observer` knows to be impostors.
    pub fn known_impostors(&self, observer: AgentId) -> Result<Vec<AgentId>> {
        self.filter_others(observer, |model, other| model.knows_impostor(observer, other))
    }

    /// Agents `observer` knows to be crewmates.
    pub fn known_crewmates(&self, observer: AgentId) -> Result<Vec<AgentId>> {
        self.filter_others(observer, |model, other| model.knows_crewmate(observer, other))
    }

    /// Agents `observer` cannot rule out as impostors.
    pub fn suspected(&self, observer: AgentId) -> Result<Vec<AgentId>> {
        self.filter_others(observer, |model, other| model.suspects(observer, other))
    }

    fn filter_others(
        &self,
        observer: AgentId,
        mut keep: impl FnMut(&Self, AgentId) -> Result<bool>,
    ) -> Result<Vec<AgentId>> {
        self.relation(observer)?;
        let mut selected = Vec::new();
        for other in self.agents().filter(|&a| a != observer) {
            if keep(self, other)? {
                selected.push(other);
            }
        }
        Ok(selected)
    }
}
