//! Epistemic knowledge engine for hidden-role deduction.
//!
//! Each round is modelled as a Kripke structure: one world per hypothesis
//! about who the impostors are, and one indistinguishability relation per
//! agent. Agents revise their knowledge privately by pruning their own
//! relation, and collaborators ask questions such as "does agent 0 know
//! that agent 3 is the impostor?" by evaluating modal formulas at the real
//! world.
//!
//! # Modules
//!
//! - [`formula`]: Formula syntax tree and constructors
//! - [`world`]: Worlds and per-agent accessibility relations
//! - [`model`]: The Kripke model and the formula evaluator
//! - [`builder`]: Construction of the initial model for a round
//! - [`update`]: Private belief revision
//! - [`queries`]: Knowledge queries and broadcast summaries
//! - [`report`]: Serializable per-agent knowledge reports
//!
//! # Example
//!
//! ```
//! use epistemic::{build, impostor_atom};
//!
//! let mut model = build(3, 1, &[2]).unwrap();
//! assert!(model.suspects(0, 1).unwrap());
//!
//! model.update(0, &impostor_atom(2)).unwrap();
//! assert!(model.knows_impostor(0, 2).unwrap());
//! assert!(!model.suspects(0, 1).unwrap());
//! ```

pub mod builder;
pub mod error;
pub mod formula;
pub mod model;
pub mod queries;
pub mod report;
pub mod update;
pub mod world;

pub use builder::{binomial, build, ModelParams, DEFAULT_MAX_WORLDS};
pub use error::EpistemicError;
pub use formula::{
    and_, atom, common_know, conjunction, implies, impostor_atom, impostor_proposition, know,
    not_, or_, Formula, IMPOSTOR_PREFIX,
};
pub use model::KripkeModel;
pub use report::{AgentKnowledge, KnowledgeReport};
pub use update::UpdateOutcome;
pub use world::{Relation, World, WorldIndex};

/// Identifier of an agent taking part in a round.
pub type AgentId = usize;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EpistemicError>;
