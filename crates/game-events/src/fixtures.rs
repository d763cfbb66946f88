//! Sample event scripts for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // game-events = { path = "../game-events", features = ["test-fixtures"] }
//!
//! use game_events::fixtures;
//!
//! let events = fixtures::witnessed_kill_events();
//! ```

use crate::{parse_script, GameEvent};

/// Raw JSONL of the witnessed kill round.
pub const WITNESSED_KILL_JSONL: &str = include_str!("../tests/fixtures/witnessed_kill.jsonl");

/// Raw JSONL of the emergency meeting round.
pub const EMERGENCY_MEETING_JSONL: &str =
    include_str!("../tests/fixtures/emergency_meeting.jsonl");

/// Five agents, agent 4 is the impostor.
///
/// - agent 0 does an ordinary task
/// - agent 2 does a visual task in front of agents 0 and 3
/// - agent 4 kills agent 1 in front of agent 2
/// - agent 2 reports the body
/// - agent 4 is ejected
pub fn witnessed_kill_events() -> Vec<GameEvent> {
    parse_fixture(WITNESSED_KILL_JSONL)
}

/// Four agents, agent 3 is the impostor.
///
/// - agent 1 does a visual task in front of agent 0
/// - agent 2 privately learns agent 0 is innocent
/// - agent 3 does an ordinary task
/// - agent 0 calls an emergency meeting
pub fn emergency_meeting_events() -> Vec<GameEvent> {
    parse_fixture(EMERGENCY_MEETING_JSONL)
}

fn parse_fixture(jsonl: &str) -> Vec<GameEvent> {
    parse_script(jsonl).unwrap_or_else(|e| panic!("Failed to parse fixture: {}", e))
}
