use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaygateError {
    #[error("Inventories directory not found: {0}")]
    InventoriesDirMissing(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Command is empty")]
    EmptyCommand,

    #[error("Git command failed: {0}")]
    Git(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlaygateError>;
