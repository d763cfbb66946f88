//! Configuration loading for the round controller.
//!
//! All settings come from a TOML file. Every section is optional, so a
//! partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use epistemic::{AgentId, DEFAULT_MAX_WORLDS};

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "round.toml";

/// Complete round configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Players and ground truth
    #[serde(default)]
    pub game: GameConfig,
    /// Knowledge engine limits
    #[serde(default)]
    pub engine: EngineConfig,
    /// Knowledge sharing during meetings
    #[serde(default)]
    pub discussion: DiscussionConfig,
    /// Report file and logging
    #[serde(default)]
    pub output: OutputConfig,
}

impl RoundConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads `path` if given, otherwise `round.toml` when it exists,
    /// otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Player count and who the impostors are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub num_agents: usize,
    pub num_impostors: usize,
    /// Fixed impostor ids; empty means draw them from `seed`
    pub impostors: Vec<AgentId>,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_agents: 5,
            num_impostors: 1,
            impostors: Vec::new(),
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Refuse to build models with more worlds than this
    pub max_worlds: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_worlds: DEFAULT_MAX_WORLDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionConfig {
    /// Crewmates broadcast their knowledge at meetings
    pub share_knowledge: bool,
    pub trust_policy: TrustPolicy,
    /// Broadcast rounds per meeting; stops early once nobody learns anything
    pub max_rounds: u32,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            share_knowledge: true,
            trust_policy: TrustPolicy::KnownCrewmates,
            max_rounds: 1,
        }
    }
}

/// Whose broadcasts a crewmate accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrustPolicy {
    /// Only speakers the receiver knows to be crewmates
    #[default]
    KnownCrewmates,
    /// Every living speaker
    Everyone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSONL file receiving one knowledge report per meeting
    pub report_path: String,
    pub log_level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: "output/knowledge_reports.jsonl".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Returns the default configuration as a TOML string.
pub fn default_config_toml() -> String {
    r#"# Round controller configuration

[game]
# Players are numbered 0..num_agents
num_agents = 5
num_impostors = 1
# Fixed impostor ids; leave empty to draw them from the seed
impostors = []
seed = 42

[engine]
# One world per possible impostor set
max_worlds = 4096

[discussion]
share_knowledge = true
# "known_crewmates" or "everyone"
trust_policy = "known_crewmates"
max_rounds = 1

[output]
report_path = "output/knowledge_reports.jsonl"
log_level = "info"
"#
    .to_string()
}
