//! Session manager messages
//!
//! Commands and replies for the actor pattern.

use tokio::sync::oneshot;

use crate::activity::TurnMessage;
use crate::dialog::{DialogError, TurnOutcome};

/// Result of one processed turn
pub type TurnResponse = Result<TurnOutcome, DialogError>;

/// Commands sent to the SessionManager actor
#[derive(Debug)]
pub enum SessionCommand {
    /// Run one turn for its conversation
    ProcessTurn {
        turn: TurnMessage,
        reply: oneshot::Sender<TurnResponse>,
    },

    /// Drop a conversation's persisted state; replies true if one existed
    EndConversation {
        conversation_id: String,
        reply: oneshot::Sender<Result<bool, DialogError>>,
    },

    /// Stop the actor loop
    Shutdown,
}
