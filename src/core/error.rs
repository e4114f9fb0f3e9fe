use thiserror::Error;

use crate::battle::state::BattleStateKind;

#[derive(Error, Debug)]
pub enum RpgError {
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Collaborator failed: {0}")]
    Collaborator(String),

    #[error("Invalid battle state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: BattleStateKind,
        to: BattleStateKind,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Inventory error: {0}")]
    Inventory(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, RpgError>;
