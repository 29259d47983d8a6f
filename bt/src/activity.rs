//! Activity types at the channel boundary
//!
//! A [`TurnMessage`] is what the external channel adapter hands the engine
//! for one turn; a [`GeneratedActivity`] is what the engine hands back.
//! Transmission is the caller's problem - activities are plain values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One inbound message, already converted from the wire by the channel adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnMessage {
    /// Raw user utterance
    pub text: String,

    /// Negotiated locale tag ("" = root/default)
    #[serde(default)]
    pub locale: String,

    /// Conversation this turn belongs to
    pub conversation_id: String,

    /// Channel-specific payload, passed through untouched
    #[serde(default)]
    pub channel_data: Value,
}

impl TurnMessage {
    /// Build a plain text turn for a conversation
    pub fn new(conversation_id: impl Into<String>, text: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: locale.into(),
            conversation_id: conversation_id.into(),
            channel_data: Value::Null,
        }
    }
}

/// Rendering output returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "body")]
pub enum GeneratedActivity {
    /// Plain text reply
    Text(String),
    /// Structured payload (e.g. a card) the channel serializes itself
    Structured(Value),
}

impl GeneratedActivity {
    /// Classify rendered template output
    ///
    /// A body whose trimmed text parses as a JSON object becomes
    /// [`GeneratedActivity::Structured`]; everything else stays text.
    pub fn from_rendered(body: String) -> Self {
        let trimmed = body.trim();
        if trimmed.starts_with('{') {
            if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
                return GeneratedActivity::Structured(value);
            }
        }
        GeneratedActivity::Text(body)
    }

    /// Text content, if this is a text activity
    pub fn as_text(&self) -> Option<&str> {
        match self {
            GeneratedActivity::Text(text) => Some(text),
            GeneratedActivity::Structured(_) => None,
        }
    }
}

impl std::fmt::Display for GeneratedActivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratedActivity::Text(text) => write!(f, "{text}"),
            GeneratedActivity::Structured(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_stays_text() {
        let activity = GeneratedActivity::from_rendered("Hello (root)".to_string());
        assert_eq!(activity, GeneratedActivity::Text("Hello (root)".to_string()));
        assert_eq!(activity.as_text(), Some("Hello (root)"));
    }

    #[test]
    fn test_json_object_becomes_structured() {
        let activity = GeneratedActivity::from_rendered(r#"  {"type": "card", "title": "Hi"}  "#.to_string());
        assert_eq!(
            activity,
            GeneratedActivity::Structured(json!({"type": "card", "title": "Hi"}))
        );
        assert!(activity.as_text().is_none());
    }

    #[test]
    fn test_malformed_json_stays_text() {
        let activity = GeneratedActivity::from_rendered("{not json".to_string());
        assert_eq!(activity, GeneratedActivity::Text("{not json".to_string()));
    }

    #[test]
    fn test_json_array_stays_text() {
        // Only objects are promoted; arrays are not activity payloads
        let activity = GeneratedActivity::from_rendered("[1, 2]".to_string());
        assert_eq!(activity, GeneratedActivity::Text("[1, 2]".to_string()));
    }

    #[test]
    fn test_turn_message_defaults() {
        let turn = TurnMessage::new("c1", "hello", "fr-fr");
        assert_eq!(turn.conversation_id, "c1");
        assert_eq!(turn.locale, "fr-fr");
        assert_eq!(turn.channel_data, Value::Null);
    }
}
