//! Engine errors.
//!
//! Every variant signals a bug in the caller rather than an environmental
//! condition, so none of them are meant to be caught and retried.

use thiserror::Error;

use crate::AgentId;

/// Errors produced by model construction, evaluation and updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EpistemicError {
    /// Bad agent/impostor counts or ground truth at build time
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A formula referenced a proposition that no world assigns
    #[error("unknown proposition `{0}`")]
    UnknownProposition(String),
    /// An update or modality named an agent without a relation
    #[error("no accessibility relation for agent {0}")]
    UnknownAgent(AgentId),
    /// An update asserted a fact that is false at the real world
    #[error("update for agent {agent} is false at the real world: {formula}")]
    ContradictsRealWorld { agent: AgentId, formula: String },
}

impl EpistemicError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EpistemicError::InvalidConfiguration(message.into())
    }
}
