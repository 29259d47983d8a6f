//! DialogEngine - the per-turn state machine
//!
//! Loads nothing and saves nothing itself: the engine advances a caller
//! supplied stack for exactly one turn and reports how the turn ended.
//! Callers (the session layer) own load/persist and the commit rule: run
//! the engine on a working copy and persist only on success, so a failed
//! step never advances the durable stack.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::activity::{GeneratedActivity, TurnMessage};
use crate::lg::Generator;

use super::error::DialogError;
use super::frame::{DialogFrame, DialogStack};
use super::set::{DialogKind, DialogSet};
use super::step::{StepContext, StepOutcome};

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// A frame is suspended mid-dialog, waiting for the next inbound turn
    Waiting,
    /// The stack drained; the conversation has no active dialog
    Complete,
}

/// Everything one turn produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub status: TurnStatus,
    pub replies: Vec<GeneratedActivity>,
}

/// Per-turn dialog state machine over a registry of definitions
pub struct DialogEngine {
    dialogs: DialogSet,
    generator: Generator,
    root_dialog: String,
}

impl DialogEngine {
    /// Build an engine over a dialog registry
    ///
    /// `root_dialog` is pushed when a turn arrives for an empty stack.
    pub fn new(dialogs: DialogSet, generator: Generator, root_dialog: impl Into<String>) -> Self {
        Self {
            dialogs,
            generator,
            root_dialog: root_dialog.into(),
        }
    }

    /// Dialog started on a conversation's first turn
    pub fn root_dialog(&self) -> &str {
        &self.root_dialog
    }

    /// Generator shared with steps
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Advance `stack` by one turn
    ///
    /// On error the turn is aborted; the caller must discard `stack` (it
    /// may be partially advanced) and keep the last committed state.
    pub fn run_turn(&self, turn: &TurnMessage, stack: &mut DialogStack) -> Result<TurnOutcome, DialogError> {
        debug!(
            conversation = %turn.conversation_id,
            locale = %turn.locale,
            depth = stack.depth(),
            "DialogEngine::run_turn: called"
        );

        let mut replies: Vec<GeneratedActivity> = Vec::new();
        // Step input: inbound text first, then a popped child's result as
        // control propagates up the stack within this turn.
        let mut input = Value::String(turn.text.clone());

        if stack.is_empty() {
            debug!(dialog = %self.root_dialog, "DialogEngine::run_turn: starting root dialog");
            if !self.dialogs.contains(&self.root_dialog) {
                return Err(DialogError::UnknownDialog(self.root_dialog.clone()));
            }
            stack.push(DialogFrame::new(&self.root_dialog));
        }

        let status = loop {
            let Some(frame) = stack.top_mut() else {
                // Final result discarded; turn ends with no dialog active.
                break TurnStatus::Complete;
            };
            let dialog = self
                .dialogs
                .get(&frame.dialog_id)
                .ok_or_else(|| DialogError::UnknownDialog(frame.dialog_id.clone()))?;
            let steps_len = dialog.step_count();

            let outcome = match dialog.kind() {
                DialogKind::Waterfall { steps } => match steps.get(frame.step_index) {
                    Some(step) => {
                        debug!(dialog = %frame.dialog_id, step = frame.step_index, "DialogEngine::run_turn: running step");
                        let mut ctx =
                            StepContext::new(turn, input.clone(), &mut frame.state, &self.generator, &mut replies);
                        match step.run(&mut ctx) {
                            Ok(outcome) => outcome,
                            Err(e) => {
                                error!(dialog = %frame.dialog_id, step = frame.step_index, error = %e, "Step failed; aborting turn");
                                return Err(e);
                            }
                        }
                    }
                    // A frame recorded past its last step completes with
                    // whatever input reached it.
                    None => StepOutcome::EndDialog(input.clone()),
                },
                DialogKind::Prompt { retry } => {
                    let text = input.as_str().unwrap_or_default().trim().to_string();
                    if text.is_empty() {
                        if let Some(retry_template) = retry {
                            let activity = self.generator.generate(retry_template, None, &turn.locale)?;
                            replies.push(activity);
                        }
                        // Frame untouched: same prompt resumes next turn.
                        break TurnStatus::Waiting;
                    }
                    StepOutcome::EndDialog(Value::String(text))
                }
            };

            match outcome {
                StepOutcome::Next(result) => {
                    frame.step_index += 1;
                    if frame.step_index >= steps_len {
                        stack.pop();
                        input = result;
                        continue;
                    }
                    break TurnStatus::Waiting;
                }
                StepOutcome::BeginChild(child_id) => {
                    // A bad reference aborts this turn, not the next one.
                    if !self.dialogs.contains(&child_id) {
                        return Err(DialogError::UnknownDialog(child_id));
                    }
                    // The recorded index is always the resume position:
                    // the child's result feeds the parent's next step.
                    frame.step_index += 1;
                    stack.push(DialogFrame::new(child_id));
                    break TurnStatus::Waiting;
                }
                StepOutcome::EndDialog(result) => {
                    stack.pop();
                    input = result;
                    continue;
                }
            }
        };

        debug!(?status, depth = stack.depth(), replies = replies.len(), "DialogEngine::run_turn: finished");
        Ok(TurnOutcome { status, replies })
    }
}

impl std::fmt::Debug for DialogEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogEngine")
            .field("root_dialog", &self.root_dialog)
            .field("dialogs", &self.dialogs.ids())
            .finish()
    }
}
