//! Round controller for hidden-role deduction.
//!
//! Replays a scripted round through an ECS world: players are entities,
//! the knowledge model is a resource, and each event runs the observe
//! schedule (plus discuss when a meeting is called). What every agent knows
//! after each meeting is written out as JSONL.

pub mod components;
pub mod config;
pub mod output;
pub mod runner;
pub mod setup;
pub mod systems;

pub use components::{Alive, Player, PlayerId, Role};
pub use config::{default_config_toml, ConfigError, RoundConfig, TrustPolicy};
pub use output::{MeetingReport, ReportWriter, TrustEdge};
pub use runner::{Outcome, RoundError, RoundRunner, RoundSummary};
