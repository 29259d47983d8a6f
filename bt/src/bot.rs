//! Built-in demo bot
//!
//! The dialog set the console host runs when nothing else is wired up: a
//! main waterfall that greets in the negotiated locale, collects the
//! user's name through a prompt child, and finishes with a structured
//! card. Every reply goes through the generator, so locale overrides in
//! the resource files show up without code changes.

use serde_json::json;

use crate::dialog::{Dialog, DialogSet, StepContext, StepOutcome};

/// Root dialog id used by the demo set
pub const MAIN_DIALOG: &str = "main";

/// Prompt dialog id used by the demo set
pub const NAME_PROMPT: &str = "namePrompt";

/// Build the demo dialog registry
pub fn demo_dialogs() -> DialogSet {
    let mut dialogs = DialogSet::new();

    dialogs.add(Dialog::waterfall(
        MAIN_DIALOG,
        vec![
            // Greet and hand off to the name prompt. The question renders
            // here: the child does not run until the next inbound turn.
            Box::new(|ctx: &mut StepContext| {
                ctx.reply_template("barTemplate", None)?;
                ctx.reply_template("askName", None)?;
                Ok(StepOutcome::BeginChild(NAME_PROMPT.to_string()))
            }),
            // The prompt's result arrives as step input.
            Box::new(|ctx: &mut StepContext| {
                let name = ctx.input.as_str().unwrap_or("friend").to_string();
                ctx.remember("name", json!(name.clone()));
                ctx.reply_template("welcome", Some(&json!({ "name": name })))?;
                Ok(StepOutcome::Next(json!(null)))
            }),
            // Frame state carries the name across the suspension.
            Box::new(|ctx: &mut StepContext| {
                let name = ctx.recall("name").cloned().unwrap_or(json!("friend"));
                ctx.reply_template("showCard", None)?;
                ctx.reply_template("profileCard", Some(&json!({ "name": name })))?;
                Ok(StepOutcome::EndDialog(name))
            }),
        ],
    ));

    dialogs.add(Dialog::prompt(NAME_PROMPT, Some("retryName".to_string())));

    dialogs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{GeneratedActivity, TurnMessage};
    use crate::dialog::{DialogEngine, DialogStack, TurnStatus};
    use crate::lg::{Generator, TemplateStore};
    use std::path::Path;
    use std::sync::Arc;

    fn demo_engine() -> DialogEngine {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/root.lg");
        let locales = vec![String::new(), "en-us".to_string(), "fr-fr".to_string()];
        let store = TemplateStore::build(root, &locales).expect("demo resources should compile");
        DialogEngine::new(demo_dialogs(), Generator::new(Arc::new(store)), MAIN_DIALOG)
    }

    fn run(engine: &DialogEngine, stack: &mut DialogStack, text: &str, locale: &str) -> crate::dialog::TurnOutcome {
        engine
            .run_turn(&TurnMessage::new("c1", text, locale), stack)
            .expect("demo turn should succeed")
    }

    #[test]
    fn test_demo_conversation_in_root_locale() {
        let engine = demo_engine();
        let mut stack = DialogStack::new();

        let first = run(&engine, &mut stack, "hi", "");
        assert_eq!(first.status, TurnStatus::Waiting);
        assert_eq!(first.replies[0].as_text(), Some("Hello (root)"));
        assert_eq!(first.replies[1].as_text(), Some("What is your name?"));
        assert_eq!(stack.depth(), 2);

        let second = run(&engine, &mut stack, "Ada", "");
        assert_eq!(second.status, TurnStatus::Waiting);
        assert_eq!(second.replies[0].as_text(), Some("Welcome, Ada!"));

        let third = run(&engine, &mut stack, "ok", "");
        assert_eq!(third.status, TurnStatus::Complete);
        assert!(stack.is_empty());
        match &third.replies[1] {
            GeneratedActivity::Structured(card) => {
                assert_eq!(card["title"], "Ada");
                assert_eq!(card["subtitle"], "Nice to meet you");
            }
            other => panic!("expected structured card, got {other:?}"),
        }
    }

    #[test]
    fn test_demo_conversation_in_french() {
        let engine = demo_engine();
        let mut stack = DialogStack::new();

        let first = run(&engine, &mut stack, "salut", "fr-fr");
        assert_eq!(first.replies[0].as_text(), Some("Bonjour"));

        let second = run(&engine, &mut stack, "Ada", "fr-fr");
        assert_eq!(second.replies[0].as_text(), Some("Bienvenue, Ada !"));

        let third = run(&engine, &mut stack, "ok", "fr-fr");
        match &third.replies[1] {
            GeneratedActivity::Structured(card) => assert_eq!(card["subtitle"], "Enchante"),
            other => panic!("expected structured card, got {other:?}"),
        }
    }

    #[test]
    fn test_unconfigured_locale_uses_root_renderings() {
        let engine = demo_engine();
        let mut stack = DialogStack::new();

        let first = run(&engine, &mut stack, "hallo", "de-de");
        assert_eq!(first.replies[0].as_text(), Some("Hello (root)"));
    }
}
