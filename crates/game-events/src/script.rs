//! Event scripts: one `GameEvent` per JSONL line.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::event::GameEvent;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read event script: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parses a JSONL event script. Blank lines are skipped; `line` in errors
/// is 1-based.
pub fn parse_script(contents: &str) -> Result<Vec<GameEvent>, ScriptError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            GameEvent::from_jsonl(l).map_err(|source| ScriptError::Parse { line: i + 1, source })
        })
        .collect()
}

pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<GameEvent>, ScriptError> {
    let contents = fs::read_to_string(path)?;
    parse_script(&contents)
}
