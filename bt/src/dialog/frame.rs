//! Dialog frames, the per-conversation stack, and its persisted record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use botstate::Record;

/// One active (possibly suspended) dialog instance and its step position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogFrame {
    /// Registered dialog this frame executes
    pub dialog_id: String,
    /// Step the frame resumes at
    pub step_index: usize,
    /// Frame-local step state, round-tripped through persistence
    #[serde(default)]
    pub state: Value,
}

impl DialogFrame {
    /// Fresh frame at step 0 with empty state
    pub fn new(dialog_id: impl Into<String>) -> Self {
        Self {
            dialog_id: dialog_id.into(),
            step_index: 0,
            state: Value::Object(serde_json::Map::new()),
        }
    }
}

/// Ordered frames; the last entry is the currently executing dialog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogStack {
    frames: Vec<DialogFrame>,
}

impl DialogStack {
    /// Empty stack (conversation with no active dialog)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of active frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, frame: DialogFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<DialogFrame> {
        self.frames.pop()
    }

    /// Currently executing frame
    pub fn top(&self) -> Option<&DialogFrame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut DialogFrame> {
        self.frames.last_mut()
    }

    /// All frames, bottom first
    pub fn frames(&self) -> &[DialogFrame] {
        &self.frames
    }
}

/// Persisted per-conversation document: `{ id, stack, updated_at }`
///
/// Owned by the dialog engine, mutated one turn at a time; the storage
/// behind it is an external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Conversation key
    pub id: String,
    /// Active dialog stack
    #[serde(default)]
    pub stack: DialogStack,
    /// Last successful turn commit
    pub updated_at: DateTime<Utc>,
}

impl ConversationRecord {
    /// Fresh record with an empty stack
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stack: DialogStack::new(),
            updated_at: Utc::now(),
        }
    }

    /// Bump the commit timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Record for ConversationRecord {
    fn collection() -> &'static str {
        "conversations"
    }

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_frame_starts_at_step_zero() {
        let frame = DialogFrame::new("main");
        assert_eq!(frame.dialog_id, "main");
        assert_eq!(frame.step_index, 0);
        assert_eq!(frame.state, json!({}));
    }

    #[test]
    fn test_stack_order() {
        let mut stack = DialogStack::new();
        assert!(stack.is_empty());

        stack.push(DialogFrame::new("parent"));
        stack.push(DialogFrame::new("child"));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top().unwrap().dialog_id, "child");

        let popped = stack.pop().unwrap();
        assert_eq!(popped.dialog_id, "child");
        assert_eq!(stack.top().unwrap().dialog_id, "parent");
    }

    #[test]
    fn test_stack_serializes_as_plain_array() {
        let mut stack = DialogStack::new();
        stack.push(DialogFrame::new("main"));
        let value = serde_json::to_value(&stack).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["dialog_id"], "main");
    }

    #[test]
    fn test_record_roundtrip() {
        let mut record = ConversationRecord::new("c1");
        record.stack.push(DialogFrame {
            dialog_id: "main".to_string(),
            step_index: 2,
            state: json!({"name": "Ada"}),
        });

        let value = serde_json::to_value(&record).unwrap();
        let loaded: ConversationRecord = serde_json::from_value(value).unwrap();
        assert_eq!(loaded, record);
        assert_eq!(ConversationRecord::collection(), "conversations");
        assert_eq!(loaded.id(), "c1");
    }
}
