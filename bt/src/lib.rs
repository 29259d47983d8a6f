//! BotTurn - locale-aware dialog turn engine
//!
//! Given an inbound message and a negotiated locale, BotTurn renders a
//! locale-appropriate response from template resources and advances a
//! persisted, stepwise dialog state machine that decides what happens
//! next in the conversation.
//!
//! # Core Concepts
//!
//! - **Eager Compilation**: every configured locale's template set builds
//!   at startup; resource and syntax errors never surface mid-conversation
//! - **Deterministic Fallback**: requested locale -> exact set -> root
//!   ("") set -> configuration error, nothing else
//! - **One Step Per Turn**: a waterfall dialog runs exactly one step per
//!   turn-resumption, suspending between steps
//! - **Commit On Persist**: a step counts only once both its execution
//!   and the stack write-back succeed, so conversations are retryable
//!
//! # Modules
//!
//! - [`lg`] - template resolution, compilation and rendering
//! - [`dialog`] - frames, step tables and the per-turn engine
//! - [`session`] - the actor serializing turns over a state store
//! - [`activity`] - inbound/outbound boundary types
//! - [`config`] - configuration types and loading
//! - [`bot`] - the built-in demo dialog set

pub mod activity;
pub mod bot;
pub mod cli;
pub mod config;
pub mod dialog;
pub mod lg;
pub mod session;

// Re-export commonly used types
pub use activity::{GeneratedActivity, TurnMessage};
pub use config::Config;
pub use dialog::{
    ConversationRecord, Dialog, DialogEngine, DialogError, DialogFrame, DialogSet, DialogStack, StepContext,
    StepOutcome, TurnOutcome, TurnStatus, WaterfallStep,
};
pub use lg::{Generator, LgError, Resolver, TemplateStore};
pub use session::SessionManager;
