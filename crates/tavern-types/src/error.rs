use thiserror::Error;

use crate::phase::{GamePhase, PhaseEvent};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TavernError {
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("Invalid quest: {0}")]
    InvalidQuest(String),

    #[error("Unknown material type: {0}")]
    UnknownMaterial(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Phase transition error: cannot transition from {from:?} via {event:?}")]
    InvalidPhaseTransition { from: GamePhase, event: PhaseEvent },

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TavernError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TavernError>;
