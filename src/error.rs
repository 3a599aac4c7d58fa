use thiserror::Error;

/// Errors raised by the fallible surfaces of the crate (store, config, logging).
///
/// Scoring itself never fails: bad input is reported inside `SdResult`.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("Agent {0} not found")]
    AgentNotFound(String),

    #[error("Invalid agent: {0}")]
    InvalidAgent(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
