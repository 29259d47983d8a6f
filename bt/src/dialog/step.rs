//! Waterfall step machinery
//!
//! A waterfall dialog is an ordered sequence of steps; exactly one step
//! executes per turn-resumption. Steps receive a [`StepContext`] to read
//! the turn, queue replies through the generator, and stash frame-local
//! state, then decide the continuation with a [`StepOutcome`].

use serde_json::Value;

use crate::activity::{GeneratedActivity, TurnMessage};
use crate::lg::{Generator, LgError};

use super::error::DialogError;

/// What a step decided should happen next
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Advance to the next step; `result` feeds upward if the dialog ends
    Next(Value),
    /// Push a child dialog and suspend until the next inbound turn
    BeginChild(String),
    /// Pop this dialog immediately, propagating `result` to the parent
    EndDialog(Value),
}

/// Execution context for one step of one turn
pub struct StepContext<'a> {
    /// Inbound message driving this turn
    pub turn: &'a TurnMessage,
    /// Step input: the inbound text, or a completed child's result
    pub input: Value,
    /// Frame-local state, persisted with the frame
    pub state: &'a mut Value,
    generator: &'a Generator,
    replies: &'a mut Vec<GeneratedActivity>,
}

impl<'a> StepContext<'a> {
    pub(super) fn new(
        turn: &'a TurnMessage,
        input: Value,
        state: &'a mut Value,
        generator: &'a Generator,
        replies: &'a mut Vec<GeneratedActivity>,
    ) -> Self {
        Self {
            turn,
            input,
            state,
            generator,
            replies,
        }
    }

    /// Negotiated locale for this turn
    pub fn locale(&self) -> &str {
        &self.turn.locale
    }

    /// Generator bound to the turn's template store
    pub fn generator(&self) -> &Generator {
        self.generator
    }

    /// Queue an already-built activity as a reply
    pub fn reply(&mut self, activity: GeneratedActivity) {
        self.replies.push(activity);
    }

    /// Render a template for the turn's locale and queue it as a reply
    pub fn reply_template(&mut self, template_name: &str, data: Option<&Value>) -> Result<(), LgError> {
        let activity = self.generator.generate(template_name, data, &self.turn.locale)?;
        self.replies.push(activity);
        Ok(())
    }

    /// Store a value in frame-local state
    pub fn remember(&mut self, key: &str, value: Value) {
        if let Value::Object(map) = self.state {
            map.insert(key.to_string(), value);
        }
    }

    /// Read a value from frame-local state
    pub fn recall(&self, key: &str) -> Option<&Value> {
        self.state.as_object().and_then(|map| map.get(key))
    }
}

/// One step of a waterfall dialog
pub trait WaterfallStep: Send + Sync {
    fn run(&self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, DialogError>;
}

impl<F> WaterfallStep for F
where
    F: Fn(&mut StepContext<'_>) -> Result<StepOutcome, DialogError> + Send + Sync,
{
    fn run(&self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, DialogError> {
        self(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lg::TemplateStore;
    use serde_json::json;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn demo_generator() -> (TempDir, Generator) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("root.lg"), "# greet\n- Hi {{name}}\n").unwrap();
        let store = TemplateStore::build(dir.path().join("root.lg"), &[String::new()]).unwrap();
        (dir, Generator::new(Arc::new(store)))
    }

    #[test]
    fn test_context_state_and_replies() {
        let (_dir, generator) = demo_generator();
        let turn = TurnMessage::new("c1", "hello", "");
        let mut state = json!({});
        let mut replies = Vec::new();

        let mut ctx = StepContext::new(&turn, json!("hello"), &mut state, &generator, &mut replies);
        ctx.remember("name", json!("Ada"));
        assert_eq!(ctx.recall("name"), Some(&json!("Ada")));
        ctx.reply_template("greet", Some(&json!({"name": "Ada"}))).unwrap();
        ctx.reply(GeneratedActivity::Text("bye".to_string()));

        assert_eq!(state, json!({"name": "Ada"}));
        assert_eq!(
            replies,
            vec![
                GeneratedActivity::Text("Hi Ada".to_string()),
                GeneratedActivity::Text("bye".to_string()),
            ]
        );
    }

    #[test]
    fn test_closures_are_steps() {
        let step: Box<dyn WaterfallStep> = Box::new(|ctx: &mut StepContext| Ok(StepOutcome::Next(ctx.input.clone())));
        let (_dir, generator) = demo_generator();
        let turn = TurnMessage::new("c1", "hello", "");
        let mut state = json!({});
        let mut replies = Vec::new();
        let mut ctx = StepContext::new(&turn, json!("hello"), &mut state, &generator, &mut replies);

        let outcome = step.run(&mut ctx).unwrap();
        assert_eq!(outcome, StepOutcome::Next(json!("hello")));
    }
}
