//! Formula Syntax
//!
//! Boolean and modal formulas over named atomic propositions. Formulas are
//! plain values: callers build them, the engine only reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AgentId;

/// Prefix of the per-agent proposition "this agent is an impostor"
pub const IMPOSTOR_PREFIX: &str = "IsImpostor:";

/// A formula of multi-agent epistemic logic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    /// Atomic proposition, looked up in each world's assignment
    Atom(String),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    /// The agent knows the inner formula
    Know(AgentId, Box<Formula>),
    /// The inner formula is common knowledge among all agents
    CommonKnow(Box<Formula>),
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Atom(name) => write!(f, "{}", name),
            Formula::Not(inner) => write!(f, "¬{}", inner),
            Formula::And(lhs, rhs) => write!(f, "({} ∧ {})", lhs, rhs),
            Formula::Or(lhs, rhs) => write!(f, "({} ∨ {})", lhs, rhs),
            Formula::Know(agent, inner) => write!(f, "K{}({})", agent, inner),
            Formula::CommonKnow(inner) => write!(f, "C({})", inner),
        }
    }
}

/// Name of the proposition stating that `agent` is an impostor.
pub fn impostor_proposition(agent: AgentId) -> String {
    format!("{}{}", IMPOSTOR_PREFIX, agent)
}

/// `IsImpostor:<agent>` as an atom.
pub fn impostor_atom(agent: AgentId) -> Formula {
    atom(impostor_proposition(agent))
}

pub fn atom(name: impl Into<String>) -> Formula {
    Formula::Atom(name.into())
}

pub fn not_(phi: Formula) -> Formula {
    Formula::Not(Box::new(phi))
}

pub fn and_(phi: Formula, psi: Formula) -> Formula {
    Formula::And(Box::new(phi), Box::new(psi))
}

pub fn or_(phi: Formula, psi: Formula) -> Formula {
    Formula::Or(Box::new(phi), Box::new(psi))
}

pub fn know(agent: AgentId, phi: Formula) -> Formula {
    Formula::Know(agent, Box::new(phi))
}

pub fn common_know(phi: Formula) -> Formula {
    Formula::CommonKnow(Box::new(phi))
}

/// Material implication, expressed as `¬φ ∨ ψ`.
pub fn implies(phi: Formula, psi: Formula) -> Formula {
    or_(not_(phi), psi)
}

/// Right-nested conjunction of all formulas, or `None` when there are none.
pub fn conjunction(formulas: impl IntoIterator<Item = Formula>) -> Option<Formula> {
    let mut formulas: Vec<Formula> = formulas.into_iter().collect();
    let last = formulas.pop()?;
    Some(
        formulas
            .into_iter()
            .rev()
            .fold(last, |acc, phi| and_(phi, acc)),
    )
}
