//! Error types for the duel core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuelError {
    /// A movement target is no longer in the zone its record claims.
    /// Nested effect steps can invalidate references captured earlier;
    /// callers inside a resolution chain degrade this to a no-op.
    #[error("Stale card reference: instance {0} is not in its claimed zone")]
    StaleReference(u32),

    /// An external actor submitted a choice that violates the pending
    /// request's arity or candidate-set constraints.
    #[error("Illegal selection: {0}")]
    IllegalSelection(String),

    /// Diagnostic for test harnesses: an activation's scheduled steps all
    /// drained without its resolve continuation firing.
    #[error("Effect resolution never terminated for card {0}")]
    ResolutionNotTerminated(u32),

    /// A hook was activated on a card whose effect table has no handler for it.
    #[error("Card {card} has no handler for hook {hook}")]
    NoSuchHandler { card: u32, hook: &'static str },

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Invalid card record: {0}")]
    InvalidCardFormat(String),

    #[error("Invalid deck list: {0}")]
    InvalidDeckFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl From<serde_json::Error> for DuelError {
    fn from(e: serde_json::Error) -> Self {
        DuelError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DuelError>;
