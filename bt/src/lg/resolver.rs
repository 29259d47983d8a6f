//! Import resolution with locale fallback
//!
//! A [`Resolver`] is bound to one locale for the lifetime of a compiled
//! set build. Resolution order for a candidate path `sub.lg` with locale
//! `fr-fr`:
//!
//! 1. `sub.fr-fr.lg` if it exists and is a regular file
//! 2. `sub.lg` otherwise
//! 3. `ResourceNotFound` if neither exists
//!
//! An existing candidate that fails to read surfaces an I/O error and
//! does not fall back.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::error::LgError;
use super::resource::TemplateResource;

/// Resolves import references to resource files for one locale
#[derive(Debug, Clone)]
pub struct Resolver {
    locale: String,
}

impl Resolver {
    /// Create a resolver bound to a locale ("" = root, no qualification)
    pub fn new(locale: impl Into<String>) -> Self {
        Self { locale: locale.into() }
    }

    /// Locale this resolver is bound to
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Resolve an import reference issued from `source`
    ///
    /// Relative ids join against `source`'s directory and normalize;
    /// absolute ids are used as-is. The returned resource's path is the
    /// key for nested resolution and dedup.
    pub fn resolve(&self, source: &Path, import_id: &str) -> Result<TemplateResource, LgError> {
        debug!(source = %source.display(), %import_id, locale = %self.locale, "Resolver::resolve: called");
        let import_path = PathBuf::from(import_id);
        let base = if import_path.is_absolute() {
            normalize(&import_path)
        } else {
            let dir = source.parent().unwrap_or_else(|| Path::new(""));
            normalize(&dir.join(import_path))
        };
        self.resolve_path(&base)
    }

    /// Resolve an already-normalized resource path (used for the root file)
    pub fn resolve_path(&self, base: &Path) -> Result<TemplateResource, LgError> {
        let chosen = if self.locale.is_empty() {
            base.to_path_buf()
        } else {
            let qualified = locale_qualified(base, &self.locale);
            if probe_file(&qualified)? {
                debug!(qualified = %qualified.display(), "Resolver::resolve_path: using locale-qualified file");
                qualified
            } else {
                base.to_path_buf()
            }
        };

        if !probe_file(&chosen)? {
            return Err(LgError::ResourceNotFound {
                path: base.to_path_buf(),
            });
        }

        let content = fs::read_to_string(&chosen).map_err(|source| LgError::Io {
            path: chosen.clone(),
            source,
        })?;

        Ok(TemplateResource { path: chosen, content })
    }
}

/// True if the path is an existing regular file
///
/// A stat failure other than not-found is an I/O error, kept distinct
/// from the missing-file case so an unreadable override is visible.
fn probe_file(path: &Path) -> Result<bool, LgError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(LgError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Insert a locale tag before the final extension
///
/// `sub.lg` + `fr-fr` -> `sub.fr-fr.lg`; a path without an extension gets
/// `.fr-fr` appended.
fn locale_qualified(path: &Path, locale: &str) -> PathBuf {
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => path.with_file_name(format!(
            "{}.{}.{}",
            stem.to_string_lossy(),
            locale,
            ext.to_string_lossy()
        )),
        _ => {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            path.with_file_name(format!("{name}.{locale}"))
        }
    }
}

/// Lexical path normalization: drops `.` components and resolves `..`
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(Component::ParentDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    #[test]
    fn test_locale_qualified_inserts_before_extension() {
        assert_eq!(
            locale_qualified(Path::new("/res/sub.lg"), "fr-fr"),
            PathBuf::from("/res/sub.fr-fr.lg")
        );
        assert_eq!(locale_qualified(Path::new("/res/sub"), "fr-fr"), PathBuf::from("/res/sub.fr-fr"));
    }

    #[test]
    fn test_normalize_resolves_dots() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d.lg")), PathBuf::from("/a/c/d.lg"));
        assert_eq!(normalize(Path::new("a/./b.lg")), PathBuf::from("a/b.lg"));
    }

    #[test]
    fn test_prefers_locale_qualified_file() {
        let dir = TempDir::new().unwrap();
        let source = write(dir.path(), "root.lg", "# t\n- root\n");
        write(dir.path(), "sub.lg", "# s\n- neutral\n");
        let qualified = write(dir.path(), "sub.fr-fr.lg", "# s\n- french\n");

        let resolver = Resolver::new("fr-fr");
        let resource = resolver.resolve(&source, "sub.lg").unwrap();
        assert_eq!(resource.path, qualified);
        assert!(resource.content.contains("french"));
    }

    #[test]
    fn test_falls_back_to_unqualified_file() {
        let dir = TempDir::new().unwrap();
        let source = write(dir.path(), "root.lg", "");
        let sub = write(dir.path(), "sub.lg", "# s\n- neutral\n");

        let resolver = Resolver::new("fr-fr");
        let resource = resolver.resolve(&source, "sub.lg").unwrap();
        assert_eq!(resource.path, sub);
        assert!(resource.content.contains("neutral"));
    }

    #[test]
    fn test_neither_candidate_is_resource_not_found() {
        let dir = TempDir::new().unwrap();
        let source = write(dir.path(), "root.lg", "");

        let resolver = Resolver::new("fr-fr");
        let err = resolver.resolve(&source, "sub.lg").unwrap_err();
        match err {
            LgError::ResourceNotFound { path } => assert_eq!(path, dir.path().join("sub.lg")),
            other => panic!("expected ResourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_root_locale_skips_qualification() {
        let dir = TempDir::new().unwrap();
        let source = write(dir.path(), "root.lg", "");
        write(dir.path(), "sub.fr-fr.lg", "# s\n- french\n");
        let sub = write(dir.path(), "sub.lg", "# s\n- neutral\n");

        let resolver = Resolver::new("");
        let resource = resolver.resolve(&source, "sub.lg").unwrap();
        assert_eq!(resource.path, sub);
    }

    #[test]
    fn test_relative_import_joins_against_source_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        let source = write(&dir.path().join("nested"), "inner.lg", "");
        let sub = write(dir.path(), "shared.lg", "# s\n- shared\n");

        let resolver = Resolver::new("");
        let resource = resolver.resolve(&source, "../shared.lg").unwrap();
        assert_eq!(resource.path, sub);
    }

    #[test]
    fn test_absolute_import_used_as_is() {
        let dir = TempDir::new().unwrap();
        let source = write(dir.path(), "root.lg", "");
        let target = write(dir.path(), "abs.lg", "# a\n- abs\n");

        let resolver = Resolver::new("");
        let resource = resolver.resolve(&source, target.to_str().unwrap()).unwrap();
        assert_eq!(resource.path, target);
    }

    #[test]
    fn test_directory_is_not_a_candidate() {
        let dir = TempDir::new().unwrap();
        let source = write(dir.path(), "root.lg", "");
        fs::create_dir(dir.path().join("sub.lg")).unwrap();

        let resolver = Resolver::new("");
        assert!(matches!(
            resolver.resolve(&source, "sub.lg"),
            Err(LgError::ResourceNotFound { .. })
        ));
    }
}
