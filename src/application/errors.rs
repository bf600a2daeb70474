//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a lookup came back empty
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("API reported failure: {0}")]
    Api(String),

    #[error("Player not found")]
    PlayerMissing,

    #[error("No Bedwars stats")]
    StatsMissing,
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LookupError::Parse(e.to_string())
        } else {
            LookupError::Network(e.to_string())
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
