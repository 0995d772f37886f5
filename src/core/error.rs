use thiserror::Error;

use crate::core::types::{AgentId, HeroId, TeamId};

#[derive(Error, Debug)]
pub enum RegenError {
    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Hero not found: {0}")]
    HeroNotFound(HeroId),

    #[error("Formula {id} failed: {reason}")]
    Formula { id: String, reason: String },

    #[error("Unknown formula: {0}")]
    UnknownFormula(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl RegenError {
    /// Shorthand for formula failures raised from inside `calculate`
    pub fn formula(id: impl Into<String>, reason: impl Into<String>) -> Self {
        RegenError::Formula {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegenError>;
