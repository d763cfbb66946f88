//! Round Phases
//!
//! A round cycles act → observe → discuss → vote → check. When nobody
//! found a corpse during observe, the round skips straight back to act.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Act,
    Observe,
    Discuss,
    Vote,
    Check,
}

impl Phase {
    /// The phase after this one. `meeting` says whether observe turned up
    /// a reason to discuss.
    pub fn next(self, meeting: bool) -> Phase {
        match self {
            Phase::Act => Phase::Observe,
            Phase::Observe if meeting => Phase::Discuss,
            Phase::Observe => Phase::Act,
            Phase::Discuss => Phase::Vote,
            Phase::Vote => Phase::Check,
            Phase::Check => Phase::Act,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Act => "act",
            Phase::Observe => "observe",
            Phase::Discuss => "discuss",
            Phase::Vote => "vote",
            Phase::Check => "check",
        };
        write!(f, "{}", name)
    }
}
