//! Finding script resources by suite name.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use walkdir::WalkDir;

use crate::engine::ScriptSource;

#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    #[error("no script found for suite `{name}` (looked for {})", .candidates.join(", "))]
    #[diagnostic(code(scriptunit::resolve::not_found))]
    NotFound {
        name: String,
        candidates: Vec<String>,
    },

    #[error("could not read {}", .path.display())]
    #[diagnostic(code(scriptunit::resolve::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not scan {}", .root.display())]
    #[diagnostic(code(scriptunit::resolve::scan))]
    Scan {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Maps a suite name to the text of its script.
pub trait ResourceResolver {
    /// Resolves `name` for a dialect whose scripts end in `.{extension}`.
    fn resolve(&self, name: &str, extension: &str) -> Result<ScriptSource, ResolveError>;
}

/// Resolves suites to files under a root directory.
///
/// `Math` resolves to `<root>/Math` if that file exists, else `<root>/Math.<ext>`.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceResolver for DirectoryResolver {
    fn resolve(&self, name: &str, extension: &str) -> Result<ScriptSource, ResolveError> {
        let exact = self.root.join(name);
        let with_extension = self.root.join(format!("{}.{}", name, extension));

        let path = [&exact, &with_extension]
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ResolveError::NotFound {
                name: name.to_string(),
                candidates: vec![
                    exact.display().to_string(),
                    with_extension.display().to_string(),
                ],
            })?;

        let text = std::fs::read_to_string(path).map_err(|source| ResolveError::Read {
            path: path.clone(),
            source,
        })?;
        let display_name = path
            .strip_prefix(&self.root)
            .unwrap_or(path.as_path())
            .display()
            .to_string();
        Ok(ScriptSource::new(display_name, text))
    }
}

/// Resolves suites from scripts held in memory. Keys are full resource names.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    scripts: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.scripts.insert(name.into(), text.into());
    }
}

impl ResourceResolver for MemoryResolver {
    fn resolve(&self, name: &str, extension: &str) -> Result<ScriptSource, ResolveError> {
        let with_extension = format!("{}.{}", name, extension);
        let found = self
            .scripts
            .get_key_value(name)
            .or_else(|| self.scripts.get_key_value(&with_extension));
        match found {
            Some((key, text)) => Ok(ScriptSource::new(key.as_str(), text.as_str())),
            None => Err(ResolveError::NotFound {
                name: name.to_string(),
                candidates: vec![name.to_string(), with_extension],
            }),
        }
    }
}

/// Every `.{extension}` script under `root`, as sorted suite names.
///
/// Names are relative to `root`, use `/` separators and drop the extension.
/// Files whose name starts with `_` are helpers for other scripts and are
/// skipped.
pub fn discover_suite_names(root: &Path, extension: &str) -> Result<Vec<String>, ResolveError> {
    let mut names = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ResolveError::Scan {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != extension) {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('_') {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
        let name = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        names.push(name);
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_resolver_prefers_exact_names() {
        let resolver = MemoryResolver::new()
            .with("Math", "exact")
            .with("Math.sutra", "with extension")
            .with("Strings.sutra", "strings");
        assert_eq!(resolver.resolve("Math", "sutra").unwrap().text, "exact");
        let strings = resolver.resolve("Strings", "sutra").unwrap();
        assert_eq!(strings.name, "Strings.sutra");
    }

    #[test]
    fn missing_resource_lists_candidates() {
        let err = MemoryResolver::new().resolve("Nope", "rhai").unwrap_err();
        let ResolveError::NotFound { name, candidates } = err else {
            panic!("expected NotFound");
        };
        assert_eq!(name, "Nope");
        assert_eq!(candidates, ["Nope", "Nope.rhai"]);
    }
}
