//! Player-attributable validation errors (SPEC_FULL.md §7).
//!
//! Grounded on the source's (empty) `logger::ErrorType` stub — the nine
//! variants here are the taxonomy the original left as a TODO.

use cc_core::ActorId;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("bot count mismatch: {message}")]
    NumberOfBotsMismatch { message: String },

    #[error("tower count mismatch: {message}")]
    NumberOfTowersMismatch { message: String },

    #[error("actor {actor_id:?}: may not alter bot property: {message}")]
    NoAlterBotProperty { actor_id: ActorId, message: String },

    #[error("actor {actor_id:?}: may not alter tower property: {message}")]
    NoAlterTowerProperty { actor_id: ActorId, message: String },

    #[error("actor {actor_id:?}: multiple tasks issued in one turn: {message}")]
    NoMultipleBotTask { actor_id: ActorId, message: String },

    #[error("actor {actor_id:?}: invalid move position: {message}")]
    InvalidMovePosition { actor_id: ActorId, message: String },

    #[error("actor {actor_id:?}: invalid blast position: {message}")]
    InvalidBlastPosition { actor_id: ActorId, message: String },

    #[error("actor {actor_id:?}: invalid transform position: {message}")]
    InvalidTransformPosition { actor_id: ActorId, message: String },

    #[error("actor {actor_id:?}: tower limit reached: {message}")]
    TowerLimitReached { actor_id: ActorId, message: String },
}

impl ValidationError {
    /// The actor this error was attributed to, where the variant carries one.
    pub fn actor_id(&self) -> Option<ActorId> {
        match self {
            ValidationError::NumberOfBotsMismatch { .. }
            | ValidationError::NumberOfTowersMismatch { .. } => None,
            ValidationError::NoAlterBotProperty { actor_id, .. }
            | ValidationError::NoAlterTowerProperty { actor_id, .. }
            | ValidationError::NoMultipleBotTask { actor_id, .. }
            | ValidationError::InvalidMovePosition { actor_id, .. }
            | ValidationError::InvalidBlastPosition { actor_id, .. }
            | ValidationError::InvalidTransformPosition { actor_id, .. }
            | ValidationError::TowerLimitReached { actor_id, .. } => Some(*actor_id),
        }
    }
}
