//! Template resource files and their section format
//!
//! A resource file is plain text with three kinds of top-level content:
//!
//! ```text
//! > comment lines start with '>'
//! [common](./common.lg)        <- import directive (before the first section)
//!
//! # templateName               <- opens a template section
//! - body line                  <- '- ' prefix is stripped
//! bare lines are kept verbatim (so a body can be a JSON object)
//! ```
//!
//! Multi-line bodies join with `\n` and render exactly as written; there
//! is no variation picking, rendering stays deterministic.

use std::path::PathBuf;

/// A resolved resource file: normalized path plus raw text content
#[derive(Debug, Clone)]
pub struct TemplateResource {
    /// Normalized path; also the cache/import key for nested resolution
    pub path: PathBuf,
    /// Raw file content
    pub content: String,
}

/// Parsed view of one resource file
#[derive(Debug, Clone, Default)]
pub struct ParsedResource {
    /// Raw import ids, as written in the file, in order
    pub imports: Vec<String>,
    /// (name, body) template sections, in order
    pub templates: Vec<(String, String)>,
}

/// Structural error in a resource file, reported with its line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub reason: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Extract the target of an import directive line, if the line is one
///
/// Import directives use the markdown link form `[label](target)`.
fn import_target(line: &str) -> Option<&str> {
    let line = line.trim();
    if !line.starts_with('[') || !line.ends_with(')') {
        return None;
    }
    let close = line.find("](")?;
    let target = &line[close + 2..line.len() - 1];
    if target.is_empty() { None } else { Some(target) }
}

/// Parse one resource file into imports and template sections
pub fn parse_resource(content: &str) -> Result<ParsedResource, ParseError> {
    let mut parsed = ParsedResource::default();
    // (name, body lines) of the section currently being collected
    let mut current: Option<(String, Vec<String>)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        if trimmed.starts_with('>') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('#') {
            if let Some((name, body)) = current.take() {
                parsed.templates.push((name, body.join("\n")));
            }
            let name = rest.trim();
            if name.is_empty() {
                return Err(ParseError {
                    line: lineno,
                    reason: "template section has no name".to_string(),
                });
            }
            current = Some((name.to_string(), Vec::new()));
            continue;
        }

        if current.is_none() {
            if let Some(target) = import_target(trimmed) {
                parsed.imports.push(target.to_string());
                continue;
            }
            if trimmed.is_empty() {
                continue;
            }
            return Err(ParseError {
                line: lineno,
                reason: format!("content outside of a template section: '{trimmed}'"),
            });
        }

        // Inside a section: '- ' lines lose the prefix, bare lines are
        // kept verbatim, blank lines separate nothing.
        let (_, body) = current.as_mut().expect("section is open");
        if let Some(stripped) = trimmed.strip_prefix("- ") {
            body.push(stripped.to_string());
        } else if trimmed == "-" {
            body.push(String::new());
        } else if !trimmed.is_empty() {
            body.push(line.to_string());
        }
    }

    if let Some((name, body)) = current.take() {
        parsed.templates.push((name, body.join("\n")));
    }

    Ok(parsed)
}
