//! Witnessed game events for hidden-role rounds.
//!
//! This crate contains pure data structures with no simulation logic: the
//! events a round controller replays, their JSONL line format, and the
//! phases of a round. Knowledge updates live in `epistemic`; turning events
//! into updates is the controller's job.

pub mod event;
pub mod phase;
pub mod script;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export event types
pub use event::{generate_event_id, EventKind, GameEvent};

// Re-export phase types
pub use phase::Phase;

// Re-export script loading
pub use script::{load_script, parse_script, ScriptError};

/// Agent identifiers are shared with the knowledge engine
pub use epistemic::AgentId;
