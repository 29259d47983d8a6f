//! Compiled template sets
//!
//! A [`CompiledTemplateSet`] is the fully-resolved, per-locale result of
//! recursively compiling a root resource and everything it imports. Sets
//! are built eagerly for every configured locale before the system
//! accepts turns, so resource and syntax errors surface at startup, and
//! are never mutated afterwards.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde_json::Value;
use tracing::{debug, info};

use super::error::LgError;
use super::resolver::Resolver;
use super::resource::parse_resource;

/// Immutable name->body mapping plus its compiled registry, for one locale
pub struct CompiledTemplateSet {
    locale: String,
    registry: Handlebars<'static>,
    bodies: BTreeMap<String, String>,
    resources: Vec<PathBuf>,
}

impl CompiledTemplateSet {
    /// Recursively compile `root` and its imports for `locale`
    fn compile(root: &Path, locale: &str) -> Result<Self, LgError> {
        debug!(root = %root.display(), %locale, "CompiledTemplateSet::compile: called");
        let resolver = Resolver::new(locale);
        let mut registry = Handlebars::new();
        // Strict mode turns a missing data field into a render error
        // instead of an empty string.
        registry.set_strict_mode(true);

        let mut bodies = BTreeMap::new();
        let mut resources = Vec::new();
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut queue: VecDeque<_> = VecDeque::new();
        queue.push_back(resolver.resolve_path(root)?);

        while let Some(resource) = queue.pop_front() {
            if !visited.insert(resource.path.clone()) {
                continue;
            }

            let parsed = parse_resource(&resource.content).map_err(|e| LgError::Compile {
                resource: resource.path.clone(),
                reason: e.to_string(),
            })?;

            for (name, body) in parsed.templates {
                if bodies.contains_key(&name) {
                    return Err(LgError::Compile {
                        resource: resource.path.clone(),
                        reason: format!("duplicate template '{name}'"),
                    });
                }
                registry
                    .register_template_string(&name, &body)
                    .map_err(|e| LgError::Compile {
                        resource: resource.path.clone(),
                        reason: e.to_string(),
                    })?;
                bodies.insert(name, body);
            }

            for import_id in parsed.imports {
                let nested = resolver.resolve(&resource.path, &import_id)?;
                if !visited.contains(&nested.path) {
                    queue.push_back(nested);
                }
            }

            resources.push(resource.path);
        }

        Ok(Self {
            locale: locale.to_string(),
            registry,
            bodies,
            resources,
        })
    }

    /// Locale this set was compiled for ("" = root)
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Template names in this set, sorted
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.bodies.keys().map(String::as_str)
    }

    /// Raw body of a template, if present
    pub fn body(&self, name: &str) -> Option<&str> {
        self.bodies.get(name).map(String::as_str)
    }

    /// Resource files that contributed to this set, in compile order
    pub fn resources(&self) -> &[PathBuf] {
        &self.resources
    }

    /// Render a named template against a data binding
    pub fn render(&self, name: &str, data: &Value) -> Result<String, LgError> {
        if !self.bodies.contains_key(name) {
            return Err(LgError::TemplateNotFound { name: name.to_string() });
        }
        self.registry.render(name, data).map_err(|e| LgError::Evaluation {
            template: name.to_string(),
            reason: e.to_string(),
        })
    }
}

impl std::fmt::Debug for CompiledTemplateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTemplateSet")
            .field("locale", &self.locale)
            .field("templates", &self.bodies.len())
            .field("resources", &self.resources.len())
            .finish()
    }
}

/// All compiled sets, keyed by locale tag
///
/// Built once at startup; read concurrently afterwards without
/// synchronization.
#[derive(Debug)]
pub struct TemplateStore {
    sets: BTreeMap<String, CompiledTemplateSet>,
}

impl TemplateStore {
    /// Eagerly build one compiled set per configured locale
    ///
    /// Fails on the first unresolvable import or malformed resource; a
    /// partial store is never returned.
    pub fn build(root: impl AsRef<Path>, locales: &[String]) -> Result<Self, LgError> {
        let root = canonical_root(root.as_ref())?;
        info!(root = %root.display(), locales = ?locales, "Building template store");

        let mut sets = BTreeMap::new();
        for locale in locales {
            if sets.contains_key(locale) {
                continue;
            }
            let set = CompiledTemplateSet::compile(&root, locale)?;
            info!(
                locale = %display_locale(locale),
                templates = set.bodies.len(),
                resources = set.resources.len(),
                "Compiled template set"
            );
            sets.insert(locale.clone(), set);
        }

        Ok(Self { sets })
    }

    /// Select the set for a requested locale
    ///
    /// Exact match, else the root ("") set, else a configuration error.
    /// This order is total and deterministic; there is no other fallback.
    pub fn select(&self, locale: &str) -> Result<&CompiledTemplateSet, LgError> {
        self.sets
            .get(locale)
            .or_else(|| self.sets.get(""))
            .ok_or_else(|| LgError::Configuration {
                locale: locale.to_string(),
            })
    }

    /// Exact-match lookup without fallback
    pub fn get(&self, locale: &str) -> Option<&CompiledTemplateSet> {
        self.sets.get(locale)
    }

    /// Configured locales, sorted
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Iterate (locale, set) pairs, sorted by locale
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompiledTemplateSet)> {
        self.sets.iter().map(|(locale, set)| (locale.as_str(), set))
    }
}

/// Canonicalize the root resource path, mapping a missing file to
/// `ResourceNotFound` rather than a bare I/O error
fn canonical_root(root: &Path) -> Result<PathBuf, LgError> {
    match fs::canonicalize(root) {
        Ok(path) => Ok(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LgError::ResourceNotFound {
            path: root.to_path_buf(),
        }),
        Err(source) => Err(LgError::Io {
            path: root.to_path_buf(),
            source,
        }),
    }
}

fn display_locale(locale: &str) -> &str {
    if locale.is_empty() { "(root)" } else { locale }
}
