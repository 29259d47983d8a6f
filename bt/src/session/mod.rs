//! Turn serialization and commit semantics
//!
//! The [`SessionManager`] actor owns the dialog engine and the state
//! store, processing turns one at a time so that overlapping turns for
//! the same conversation cannot interleave. Persistence happens only
//! after a turn succeeds.

mod manager;
mod messages;

pub use manager::SessionManager;
pub use messages::{SessionCommand, TurnResponse};
