//! Event Types
//!
//! Things that happen during a round which some agents witness. Each event
//! is one JSON object per line, tagged by `"type"`.

use epistemic::Formula;
use serde::{Deserialize, Serialize};

use crate::AgentId;

/// A single witnessed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub event_id: String,
    /// Simulation tick the event happened at
    pub tick: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// An impostor killed a crewmate in front of the witnesses
    Kill {
        killer: AgentId,
        victim: AgentId,
        #[serde(default)]
        witnesses: Vec<AgentId>,
    },
    /// A task only a crewmate can perform, done in front of the witnesses
    VisualTask {
        agent: AgentId,
        #[serde(default)]
        witnesses: Vec<AgentId>,
    },
    /// An ordinary task; proves nothing
    Task {
        agent: AgentId,
        #[serde(default)]
        room: String,
    },
    /// A corpse was found and reported, starting a meeting
    BodyReported { reporter: AgentId, victim: AgentId },
    /// A meeting called without a corpse
    EmergencyMeeting { caller: AgentId },
    /// A custom fact privately learned by one agent
    Observation { observer: AgentId, formula: Formula },
    /// An agent was voted out and leaves play
    Ejection { agent: AgentId },
}

impl EventKind {
    /// The snake_case tag used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Kill { .. } => "kill",
            EventKind::VisualTask { .. } => "visual_task",
            EventKind::Task { .. } => "task",
            EventKind::BodyReported { .. } => "body_reported",
            EventKind::EmergencyMeeting { .. } => "emergency_meeting",
            EventKind::Observation { .. } => "observation",
            EventKind::Ejection { .. } => "ejection",
        }
    }

    /// Whether this event moves the round into discussion
    pub fn starts_meeting(&self) -> bool {
        matches!(
            self,
            EventKind::BodyReported { .. } | EventKind::EmergencyMeeting { .. }
        )
    }

    /// Every agent id the event mentions, witnesses included.
    pub fn agents(&self) -> Vec<AgentId> {
        match self {
            EventKind::Kill {
                killer,
                victim,
                witnesses,
            } => {
                let mut ids = vec![*killer, *victim];
                ids.extend(witnesses);
                ids
            }
            EventKind::VisualTask { agent, witnesses } => {
                let mut ids = vec![*agent];
                ids.extend(witnesses);
                ids
            }
            EventKind::Task { agent, .. } | EventKind::Ejection { agent } => vec![*agent],
            EventKind::BodyReported { reporter, victim } => vec![*reporter, *victim],
            EventKind::EmergencyMeeting { caller } => vec![*caller],
            EventKind::Observation { observer, .. } => vec![*observer],
        }
    }
}

impl GameEvent {
    pub fn new(event_id: impl Into<String>, tick: u64, kind: EventKind) -> Self {
        Self {
            event_id: event_id.into(),
            tick,
            kind,
        }
    }

    /// Serializes the event to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}
