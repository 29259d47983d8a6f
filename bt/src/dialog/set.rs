//! Dialog definitions and the registry that holds them
//!
//! Dialog behavior is a tagged variant driven by an explicit step table
//! per dialog id; frames dispatch on `(dialog_id, step_index)` with no
//! inheritance involved.

use std::collections::HashMap;

use tracing::warn;

use super::step::WaterfallStep;

/// Behavior of a registered dialog
pub enum DialogKind {
    /// Ordered step table; one step runs per turn-resumption
    Waterfall { steps: Vec<Box<dyn WaterfallStep>> },
    /// Captures the next non-blank utterance as its result
    ///
    /// Blank input re-renders `retry` (when set) and keeps waiting.
    Prompt { retry: Option<String> },
}

/// A named dialog definition
pub struct Dialog {
    id: String,
    kind: DialogKind,
}

impl Dialog {
    /// Define a waterfall dialog from its step table
    pub fn waterfall(id: impl Into<String>, steps: Vec<Box<dyn WaterfallStep>>) -> Self {
        Self {
            id: id.into(),
            kind: DialogKind::Waterfall { steps },
        }
    }

    /// Define a prompt dialog, optionally with a retry template
    pub fn prompt(id: impl Into<String>, retry: Option<String>) -> Self {
        Self {
            id: id.into(),
            kind: DialogKind::Prompt { retry },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &DialogKind {
        &self.kind
    }

    /// Steps in the table (0 for prompts)
    pub fn step_count(&self) -> usize {
        match &self.kind {
            DialogKind::Waterfall { steps } => steps.len(),
            DialogKind::Prompt { .. } => 0,
        }
    }
}

impl std::fmt::Debug for Dialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.kind {
            DialogKind::Waterfall { steps } => format!("Waterfall({} steps)", steps.len()),
            DialogKind::Prompt { retry } => format!("Prompt(retry: {retry:?})"),
        };
        f.debug_struct("Dialog").field("id", &self.id).field("kind", &kind).finish()
    }
}

/// Registry of dialog definitions keyed by id
#[derive(Debug, Default)]
pub struct DialogSet {
    dialogs: HashMap<String, Dialog>,
}

impl DialogSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dialog; re-registering an id replaces the definition
    pub fn add(&mut self, dialog: Dialog) -> &mut Self {
        if self.dialogs.contains_key(dialog.id()) {
            warn!(id = %dialog.id(), "DialogSet::add: replacing existing dialog");
        }
        self.dialogs.insert(dialog.id().to_string(), dialog);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Dialog> {
        self.dialogs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dialogs.contains_key(id)
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.dialogs.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
