use thiserror::Error;

use crate::core::types::DieId;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },

    #[error("Modifier set is at capacity ({0})")]
    AtCapacity(usize),

    #[error("Modifier already equipped: {0}")]
    AlreadyEquipped(String),

    #[error("Modifier not equipped: {0}")]
    NotEquipped(String),

    #[error("Wrong phase: expected {expected}, currently {actual}")]
    WrongPhase {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Die not found: {0:?}")]
    UnknownDie(DieId),

    #[error("Unexpected settle signal from die {0:?}")]
    UnexpectedSettle(DieId),

    #[error("No round in progress")]
    NoActiveRound,

    #[error("No throw in flight")]
    NoThrowInFlight,

    #[error("Throw stalled with {remaining} dice never settling")]
    ThrowStalled { remaining: usize },

    #[error("Game over: round {0} was lost")]
    GameOver(u32),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
