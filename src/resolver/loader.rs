//! Template loaders: map a logical template name to its source.
//!
//! The resolver only needs `TemplateLoader::load`. Two loaders ship with
//! the crate: one searching directories on disk, one holding templates
//! in memory (those have no file, so their path is empty).

use crate::utils::error::LoaderError;
use log::debug;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Namespace used for names without an `@Namespace/` prefix
pub const MAIN_NAMESPACE: &str = "__main__";

/// Where a template's source lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    /// Logical name the template was requested under
    pub name: String,

    /// Path on disk; empty for templates that do not come from a file
    pub path: PathBuf,
}

/// Looks templates up by logical name
pub trait TemplateLoader {
    /// # Errors
    /// * `LoaderError::NotFound` - no template with that name
    /// * `LoaderError::InvalidName` - the name itself is unusable
    fn load(&self, name: &str) -> Result<TemplateSource, LoaderError>;
}

/// Loader searching ordered directory lists, one list per namespace
#[derive(Debug, Clone, Default)]
pub struct FilesystemLoader {
    paths: BTreeMap<String, Vec<PathBuf>>,
}

impl FilesystemLoader {
    /// Create a loader searching `paths` in order for un-namespaced names
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut loader = Self::default();
        for path in paths {
            loader.add_path(path, MAIN_NAMESPACE);
        }
        loader
    }

    /// Append a search directory to `namespace`
    pub fn add_path(&mut self, path: impl Into<PathBuf>, namespace: &str) {
        self.paths
            .entry(namespace.to_string())
            .or_default()
            .push(path.into());
    }

    /// Put a search directory in front of the existing ones
    pub fn prepend_path(&mut self, path: impl Into<PathBuf>, namespace: &str) {
        self.paths
            .entry(namespace.to_string())
            .or_default()
            .insert(0, path.into());
    }

    /// Search directories registered for `namespace`
    pub fn paths(&self, namespace: &str) -> &[PathBuf] {
        self.paths.get(namespace).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }
}

impl TemplateLoader for FilesystemLoader {
    fn load(&self, name: &str) -> Result<TemplateSource, LoaderError> {
        let (namespace, short_name) = split_namespace(name)?;
        validate_name(name, short_name)?;

        let dirs = self.paths(namespace);
        if dirs.is_empty() {
            debug!("No registered paths for namespace '{}'", namespace);
            return Err(LoaderError::NotFound(name.to_string()));
        }

        dirs.iter()
            .map(|dir| dir.join(short_name))
            .find(|candidate| candidate.is_file())
            .map(|path| TemplateSource {
                name: name.to_string(),
                path,
            })
            .ok_or_else(|| LoaderError::NotFound(name.to_string()))
    }
}

/// Loader backed by an in-memory name -> source map
#[derive(Debug, Clone, Default)]
pub struct ArrayLoader {
    templates: BTreeMap<String, String>,
}

impl ArrayLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.set_template(name, source);
        self
    }

    pub fn set_template(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(name.into(), source.into());
    }

    /// Source code of a stored template
    pub fn source(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }
}

impl TemplateLoader for ArrayLoader {
    fn load(&self, name: &str) -> Result<TemplateSource, LoaderError> {
        if self.templates.contains_key(name) {
            Ok(TemplateSource {
                name: name.to_string(),
                path: PathBuf::new(),
            })
        } else {
            Err(LoaderError::NotFound(name.to_string()))
        }
    }
}

/// Reject names whose path part is empty, contains NUL, or climbs out of
/// the search root. `short_name` is `name` with any namespace removed.
///
/// **Private** - internal validation
fn validate_name(name: &str, short_name: &str) -> Result<(), LoaderError> {
    let invalid = |reason: &str| LoaderError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if short_name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if short_name.contains('\0') {
        return Err(invalid("name contains a NUL byte"));
    }

    let rooted = short_name.starts_with(['/', '\\'])
        || Path::new(short_name)
            .components()
            .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)));
    if rooted {
        return Err(invalid("absolute paths are not allowed"));
    }

    let mut level: i64 = 0;
    for part in short_name.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => level -= 1,
            _ => level += 1,
        }
        if level < 0 {
            return Err(invalid("name points outside the configured directories"));
        }
    }

    Ok(())
}

/// Split `@Namespace/path` into its parts
///
/// **Private** - internal helper
fn split_namespace(name: &str) -> Result<(&str, &str), LoaderError> {
    match name.strip_prefix('@') {
        Some(rest) => match rest.split_once('/') {
            Some((namespace, short_name)) if !namespace.is_empty() && !short_name.is_empty() => {
                Ok((namespace, short_name))
            }
            _ => Err(LoaderError::InvalidName {
                name: name.to_string(),
                reason: "malformed namespaced template name".to_string(),
            }),
        },
        None => Ok((MAIN_NAMESPACE, name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn check(name: &str) -> Result<(), LoaderError> {
        let (_, short_name) = split_namespace(name)?;
        validate_name(name, short_name)
    }

    #[test]
    fn test_validate_name() {
        assert!(check("pages/index.tpl").is_ok());
        assert!(check("pages/../index.tpl").is_ok());
        assert!(check("./index.tpl").is_ok());
        assert!(check("@admin/list.tpl").is_ok());
        assert!(check("").is_err());
        assert!(check("../secret.tpl").is_err());
        assert!(check("pages/../../secret.tpl").is_err());
        assert!(check("bad\0name.tpl").is_err());
        assert!(check("/etc/secret.tpl").is_err());
        assert!(check("\\secret.tpl").is_err());
    }

    #[test]
    fn test_namespaced_names_stay_inside_namespace() {
        assert!(check("@ns/../secret.tpl").is_err());
        assert!(check("@ns/pages/../../secret.tpl").is_err());
        assert!(check("@ns//etc/secret.tpl").is_err());
        assert!(check("@ns/\\etc/secret.tpl").is_err());
    }

    #[test]
    fn test_filesystem_loader_rejects_escapes() {
        let outside = tempfile::tempdir().unwrap();
        let registered = tempfile::tempdir().unwrap();
        fs::create_dir_all(registered.path().join("inner")).unwrap();
        fs::write(outside.path().join("secret.tpl"), "").unwrap();
        fs::write(registered.path().join("secret.tpl"), "").unwrap();

        let mut loader = FilesystemLoader::default();
        loader.add_path(registered.path().join("inner"), "ns");

        // "@ns//tmp/.../secret.tpl" on unix
        let absolute = format!("@ns/{}", outside.path().join("secret.tpl").display());

        for name in [absolute.as_str(), "@ns/../secret.tpl"] {
            assert!(
                matches!(loader.load(name), Err(LoaderError::InvalidName { .. })),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_split_namespace() {
        assert_eq!(
            split_namespace("@admin/list.tpl").unwrap(),
            ("admin", "list.tpl")
        );
        assert_eq!(
            split_namespace("list.tpl").unwrap(),
            (MAIN_NAMESPACE, "list.tpl")
        );
        assert!(split_namespace("@admin").is_err());
        assert!(split_namespace("@/list.tpl").is_err());
    }

    #[test]
    fn test_filesystem_loader_search_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(second.path().join("a.tpl"), "second").unwrap();
        fs::write(second.path().join("b.tpl"), "second").unwrap();
        fs::write(first.path().join("b.tpl"), "first").unwrap();

        let loader = FilesystemLoader::new([first.path(), second.path()]);

        assert_eq!(loader.load("a.tpl").unwrap().path, second.path().join("a.tpl"));
        assert_eq!(loader.load("b.tpl").unwrap().path, first.path().join("b.tpl"));
        assert!(matches!(
            loader.load("missing.tpl"),
            Err(LoaderError::NotFound(_))
        ));
    }

    #[test]
    fn test_filesystem_loader_namespaces() {
        let main = tempfile::tempdir().unwrap();
        let admin = tempfile::tempdir().unwrap();
        fs::write(admin.path().join("list.tpl"), "").unwrap();

        let mut loader = FilesystemLoader::new([main.path()]);
        loader.add_path(admin.path(), "admin");

        let source = loader.load("@admin/list.tpl").unwrap();
        assert_eq!(source.name, "@admin/list.tpl");
        assert_eq!(source.path, admin.path().join("list.tpl"));

        assert!(loader.load("list.tpl").is_err());
        assert!(loader.load("@shop/list.tpl").is_err());
    }

    #[test]
    fn test_prepend_path_takes_priority() {
        let low = tempfile::tempdir().unwrap();
        let high = tempfile::tempdir().unwrap();
        fs::write(low.path().join("a.tpl"), "").unwrap();
        fs::write(high.path().join("a.tpl"), "").unwrap();

        let mut loader = FilesystemLoader::new([low.path()]);
        loader.prepend_path(high.path(), MAIN_NAMESPACE);

        assert_eq!(loader.paths(MAIN_NAMESPACE).len(), 2);
        assert_eq!(loader.load("a.tpl").unwrap().path, high.path().join("a.tpl"));
    }

    #[test]
    fn test_array_loader_has_no_path() {
        let loader = ArrayLoader::new().with_template("inline.tpl", "Hello {{ name }}");

        let source = loader.load("inline.tpl").unwrap();
        assert!(source.path.as_os_str().is_empty());
        assert_eq!(loader.source("inline.tpl"), Some("Hello {{ name }}"));
        assert!(loader.load("other.tpl").is_err());
    }
}
