//! Dialog error types

use thiserror::Error;

use crate::lg::LgError;

/// Errors that can occur while running a turn
#[derive(Debug, Error)]
pub enum DialogError {
    /// A frame or step referenced a dialog id with no registered definition
    #[error("Unknown dialog: {0}")]
    UnknownDialog(String),

    /// Step logic failed for a reason of its own
    #[error("Dialog '{dialog}' step {step} failed: {reason}")]
    Step {
        dialog: String,
        step: usize,
        reason: String,
    },

    /// Template resolution or rendering failed inside a step
    #[error(transparent)]
    Lg(#[from] LgError),

    /// Conversation-state persistence failed
    #[error("State store error: {0}")]
    Store(#[from] botstate::StoreError),

    /// The session actor is gone
    #[error("Turn processing channel closed")]
    ChannelClosed,
}

impl DialogError {
    /// Render errors the host should degrade to a generic reply instead of
    /// surfacing to the user
    pub fn is_degradable(&self) -> bool {
        matches!(self, DialogError::Lg(e) if e.is_degradable())
    }
}
