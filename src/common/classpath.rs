//! Classpath resolution for the parent type loader
//!
//! A generated subtype is compiled against the classpath of the loader that
//! defined its target. Resolution follows javac's priority order:
//! 1. an explicit classpath argument (highest priority)
//! 2. the `CLASSPATH` environment variable
//! 3. the current directory "." (default fallback)

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Platform-specific separator between classpath entries
pub const PATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Ordered list of classpath entries standing in for a parent type loader.
///
/// An empty `ClassPath` means "inherit": the build bridge falls back to
/// [`ClasspathResolver::resolve_classpath`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClassPath {
    entries: Vec<PathBuf>,
}

impl ClassPath {
    pub fn new<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a separator-joined classpath string
    pub fn parse(classpath: &str) -> Self {
        Self::new(ClasspathResolver::parse_classpath_entries(classpath))
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: impl Into<PathBuf>) {
        self.entries.push(entry.into());
    }

    pub fn contains(&self, entry: &Path) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    /// Entries of `self` followed by entries of `other` not already present
    pub fn merged(&self, other: &ClassPath) -> ClassPath {
        let mut merged = self.clone();
        for entry in &other.entries {
            if !merged.contains(entry) {
                merged.entries.push(entry.clone());
            }
        }
        merged
    }
}

impl fmt::Display for ClassPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            write!(f, "{}", entry.display())?;
        }
        Ok(())
    }
}

/// javac-aligned classpath resolver
pub struct ClasspathResolver;

impl ClasspathResolver {
    /// Resolve the effective classpath string.
    ///
    /// Never empty: always falls back to ".".
    pub fn resolve_classpath(explicit: Option<&str>) -> String {
        if let Some(cp) = explicit.filter(|cp| !cp.is_empty()) {
            log::debug!("classpath: using explicit argument: {}", cp);
            return cp.to_string();
        }

        if let Ok(classpath_env) = env::var("CLASSPATH") {
            if !classpath_env.is_empty() {
                log::debug!("classpath: using CLASSPATH environment variable: {}", classpath_env);
                return classpath_env;
            }
        }

        log::debug!("classpath: using default (current directory)");
        ".".to_string()
    }

    /// Effective classpath for compiling against `parent`: the parent's own
    /// entries when it has any, otherwise the resolved default.
    pub fn for_parent(parent: &ClassPath, explicit: Option<&str>) -> ClassPath {
        let fallback = ClassPath::parse(&Self::resolve_classpath(explicit));
        if parent.is_empty() {
            fallback
        } else if explicit.is_some() {
            parent.merged(&fallback)
        } else {
            parent.clone()
        }
    }

    /// Split a classpath string into its trimmed, non-empty entries
    pub fn parse_classpath_entries(classpath: &str) -> Vec<String> {
        if classpath.is_empty() {
            return vec![];
        }

        classpath
            .split(PATH_SEPARATOR)
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect()
    }
}
