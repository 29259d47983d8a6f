//! Language-generation error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving, compiling or rendering templates
#[derive(Debug, Error)]
pub enum LgError {
    /// Neither the locale-qualified nor the unqualified resource file exists
    #[error("Template resource not found: {path}")]
    ResourceNotFound { path: PathBuf },

    /// A resource exists but could not be read
    ///
    /// Distinct from [`LgError::ResourceNotFound`]: an unreadable locale
    /// override does not fall back to the root file.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed template resource (bad section structure or body syntax)
    #[error("Compile error in {resource}: {reason}")]
    Compile { resource: PathBuf, reason: String },

    /// Neither the requested locale nor the root ("") set exists
    #[error("No template set for locale '{locale}' and no root set configured")]
    Configuration { locale: String },

    /// Template name absent from the selected compiled set
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    /// Expression evaluation against the data binding failed
    #[error("Evaluation of template '{template}' failed: {reason}")]
    Evaluation { template: String, reason: String },
}

impl LgError {
    /// Errors that should have been caught by the eager startup build
    ///
    /// When one of these surfaces, the process should refuse to serve.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            LgError::ResourceNotFound { .. } | LgError::Io { .. } | LgError::Compile { .. }
        )
    }

    /// Runtime rendering errors the host should degrade to a fallback reply
    pub fn is_degradable(&self) -> bool {
        matches!(self, LgError::TemplateNotFound { .. } | LgError::Evaluation { .. })
    }
}
