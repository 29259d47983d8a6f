//! Multilingual generator
//!
//! Selects the compiled set for a requested locale (exact match, else the
//! root set) and renders a named template against a data binding into an
//! outbound activity. Rendering is pure: same (template, data, set) in,
//! same activity out.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::activity::GeneratedActivity;

use super::error::LgError;
use super::store::TemplateStore;

/// Locale-aware template renderer over an immutable [`TemplateStore`]
#[derive(Debug, Clone)]
pub struct Generator {
    store: Arc<TemplateStore>,
}

impl Generator {
    /// Wrap an eagerly-built store
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }

    /// Render `template_name` against `data` for a requested locale
    ///
    /// `data` of None renders against an empty binding (templates with no
    /// placeholders work; strict mode rejects ones that reference fields).
    pub fn generate(&self, template_name: &str, data: Option<&Value>, locale: &str) -> Result<GeneratedActivity, LgError> {
        debug!(%template_name, %locale, has_data = data.is_some(), "Generator::generate: called");
        let set = self.store.select(locale)?;
        let body = set.render(template_name, data.unwrap_or(&Value::Null))?;
        Ok(GeneratedActivity::from_rendered(body))
    }

    /// The underlying store (read-only)
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).expect("Failed to write fixture");
    }

    fn demo_generator(locales: &[&str]) -> (TempDir, Generator) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write(
            dir.path(),
            "root.lg",
            concat!(
                "# barTemplate\n- Hello (root)\n\n",
                "# greet\n- Hi {{name}}\n\n",
                "# nested\n- before {{> greet}} after\n\n",
                "# card\n- {\"type\": \"card\", \"title\": \"{{title}}\"}\n",
            ),
        );
        write(dir.path(), "root.fr-fr.lg", "# barTemplate\n- Bonjour\n");
        let locales: Vec<String> = locales.iter().map(|l| l.to_string()).collect();
        let store = TemplateStore::build(dir.path().join("root.lg"), &locales).expect("Failed to build store");
        (dir, Generator::new(Arc::new(store)))
    }

    #[test]
    fn test_exact_locale_rendering() {
        let (_dir, generator) = demo_generator(&["", "fr-fr"]);
        let activity = generator.generate("barTemplate", None, "fr-fr").unwrap();
        assert_eq!(activity, GeneratedActivity::Text("Bonjour".to_string()));
    }

    #[test]
    fn test_unconfigured_locale_falls_back_to_root() {
        let (_dir, generator) = demo_generator(&["", "fr-fr"]);
        let activity = generator.generate("barTemplate", None, "de-de").unwrap();
        assert_eq!(activity, GeneratedActivity::Text("Hello (root)".to_string()));
    }

    #[test]
    fn test_no_set_at_all_is_configuration_error() {
        let (_dir, generator) = demo_generator(&["fr-fr"]);
        assert!(matches!(
            generator.generate("barTemplate", None, "de-de"),
            Err(LgError::Configuration { .. })
        ));
    }

    #[test]
    fn test_unknown_template_is_template_not_found() {
        let (_dir, generator) = demo_generator(&[""]);
        assert!(matches!(
            generator.generate("missing", None, ""),
            Err(LgError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_field_is_evaluation_error() {
        let (_dir, generator) = demo_generator(&[""]);
        assert!(matches!(
            generator.generate("greet", Some(&json!({})), ""),
            Err(LgError::Evaluation { .. })
        ));
    }

    #[test]
    fn test_composition_through_partials() {
        let (_dir, generator) = demo_generator(&[""]);
        let activity = generator.generate("nested", Some(&json!({"name": "Ada"})), "").unwrap();
        assert_eq!(activity, GeneratedActivity::Text("before Hi Ada after".to_string()));
    }

    #[test]
    fn test_structured_output() {
        let (_dir, generator) = demo_generator(&[""]);
        let activity = generator.generate("card", Some(&json!({"title": "Hi"})), "").unwrap();
        assert_eq!(
            activity,
            GeneratedActivity::Structured(json!({"type": "card", "title": "Hi"}))
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let (_dir, generator) = demo_generator(&["", "fr-fr"]);
        let data = json!({"name": "Ada"});
        let first = generator.generate("greet", Some(&data), "fr-fr").unwrap();
        for _ in 0..10 {
            assert_eq!(generator.generate("greet", Some(&data), "fr-fr").unwrap(), first);
        }
    }
}
