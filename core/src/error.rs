use thiserror::Error;

use crate::types::SoldierId;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Malformed data: {reason}")]
    MalformedData { reason: String },

    #[error("Config for soldier type '{soldier_type}' not found (soldier {soldier_id})")]
    MissingConfig {
        soldier_id:   SoldierId,
        soldier_type: String,
    },

    #[error("Invalid action: {reason}")]
    InvalidAction { reason: String },

    #[error("Snapshot index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BattleError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedData { reason: reason.into() }
    }

    pub fn invalid_action(reason: impl Into<String>) -> Self {
        Self::InvalidAction { reason: reason.into() }
    }
}

pub type BattleResult<T> = Result<T, BattleError>;
