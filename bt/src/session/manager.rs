//! SessionManager - actor that owns the engine and the state store
//!
//! Turns are processed via a command channel, one at a time, which is the
//! external serialization the engine relies on: two turns for the same
//! conversation can never interleave. A step is committed only once both
//! its execution and the persistence of the updated stack succeed; on any
//! error the durable record stays at the last committed point, so the
//! conversation is safely retryable.

use botstate::{StateStore, StateStoreExt};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::activity::TurnMessage;
use crate::dialog::{ConversationRecord, DialogEngine, DialogError, TurnOutcome};

use super::messages::SessionCommand;

const COMMAND_BUFFER: usize = 64;

/// Handle to send commands to the SessionManager actor
#[derive(Clone)]
pub struct SessionManager {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionManager {
    /// Spawn the actor, taking ownership of the engine and the store
    pub fn spawn(engine: DialogEngine, store: Box<dyn StateStore>) -> Self {
        debug!(root_dialog = %engine.root_dialog(), "SessionManager::spawn: called");
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(run_loop(engine, store, rx));
        Self { tx }
    }

    /// Process one inbound turn and wait for its outcome
    pub async fn process_turn(&self, turn: TurnMessage) -> Result<TurnOutcome, DialogError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::ProcessTurn { turn, reply })
            .await
            .map_err(|_| DialogError::ChannelClosed)?;
        rx.await.map_err(|_| DialogError::ChannelClosed)?
    }

    /// Drop a conversation's persisted state
    pub async fn end_conversation(&self, conversation_id: impl Into<String>) -> Result<bool, DialogError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::EndConversation {
                conversation_id: conversation_id.into(),
                reply,
            })
            .await
            .map_err(|_| DialogError::ChannelClosed)?;
        rx.await.map_err(|_| DialogError::ChannelClosed)?
    }

    /// Ask the actor to stop once queued commands drain
    pub async fn shutdown(&self) {
        let _ = self.tx.send(SessionCommand::Shutdown).await;
    }
}

async fn run_loop(engine: DialogEngine, store: Box<dyn StateStore>, mut rx: mpsc::Receiver<SessionCommand>) {
    info!("SessionManager started");
    while let Some(command) = rx.recv().await {
        match command {
            SessionCommand::ProcessTurn { turn, reply } => {
                let conversation = turn.conversation_id.clone();
                let result = handle_turn(&engine, store.as_ref(), &turn);
                if let Err(ref e) = result {
                    warn!(%conversation, error = %e, "Turn aborted; stack left at last committed state");
                }
                let _ = reply.send(result);
            }
            SessionCommand::EndConversation { conversation_id, reply } => {
                debug!(%conversation_id, "SessionManager: ending conversation");
                let result = store
                    .delete_record::<ConversationRecord>(&conversation_id)
                    .map_err(DialogError::from);
                let _ = reply.send(result);
            }
            SessionCommand::Shutdown => {
                info!("SessionManager shutting down");
                break;
            }
        }
    }
}

/// Load, run, and persist one turn
///
/// The engine runs on a working copy of the stack; the record is written
/// back only when the turn succeeded.
fn handle_turn(engine: &DialogEngine, store: &dyn StateStore, turn: &TurnMessage) -> Result<TurnOutcome, DialogError> {
    let mut record = store
        .get_record::<ConversationRecord>(&turn.conversation_id)?
        .unwrap_or_else(|| ConversationRecord::new(&turn.conversation_id));

    let mut stack = record.stack.clone();
    let outcome = engine.run_turn(turn, &mut stack)?;

    record.stack = stack;
    record.touch();
    store.put_record(&record)?;

    Ok(outcome)
}
