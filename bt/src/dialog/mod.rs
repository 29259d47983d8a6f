//! Dialog continuation state machine
//!
//! A conversation's position is a stack of `(dialog_id, step_index,
//! state)` frames, persisted between turns. Each inbound turn resumes the
//! top frame (or starts the root dialog), runs exactly one step, and ends
//! either `Waiting` (a frame is suspended) or `Complete` (the stack
//! drained). Steps render replies through the language-generation
//! [`Generator`](crate::lg::Generator).

mod engine;
mod error;
mod frame;
mod set;
mod step;

pub use engine::{DialogEngine, TurnOutcome, TurnStatus};
pub use error::DialogError;
pub use frame::{ConversationRecord, DialogFrame, DialogStack};
pub use set::{Dialog, DialogKind, DialogSet};
pub use step::{StepContext, StepOutcome, WaterfallStep};
