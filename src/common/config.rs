//! Synthesis and build configuration
//!
//! Built with `Config::default().with_...()`; `from_env` overlays the
//! `STUBSYNTH_*` environment variables.

use crate::common::error::{Error, Result};
use crate::consts::{
    DEFAULT_COMPILER_OPTIONS, DEFAULT_JAVAC, DEFAULT_VALUE_PROVIDER, DEFAULT_VALUE_PROVIDER_METHOD,
    ENV_CLASSPATH, ENV_JAVAC, ENV_VALUE_PROVIDER, IMPL_SUFFIX,
};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Appended to the target's simple name to name the generated type
    pub impl_suffix: String,
    /// Fully qualified class whose static method manufactures return values
    pub value_provider: String,
    pub value_provider_method: String,
    /// Options passed through to the build service
    pub compiler_options: Vec<String>,
    /// Drop compiler warnings instead of logging them
    pub ignore_warnings: bool,
    /// Compile each target once and reuse the compiled unit
    pub memoize: bool,
    /// `javac` executable used by the javac bridge
    pub javac: PathBuf,
    /// Classpath added to every compilation
    pub classpath: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            impl_suffix: IMPL_SUFFIX.to_string(),
            value_provider: DEFAULT_VALUE_PROVIDER.to_string(),
            value_provider_method: DEFAULT_VALUE_PROVIDER_METHOD.to_string(),
            compiler_options: DEFAULT_COMPILER_OPTIONS.iter().map(|o| o.to_string()).collect(),
            ignore_warnings: true,
            memoize: true,
            javac: PathBuf::from(DEFAULT_JAVAC),
            classpath: None,
        }
    }
}

impl Config {
    /// Default configuration with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(javac) = std::env::var(ENV_JAVAC) {
            if !javac.is_empty() {
                config.javac = PathBuf::from(javac);
            }
        }
        if let Ok(provider) = std::env::var(ENV_VALUE_PROVIDER) {
            // CLASS or CLASS#METHOD
            match provider.split_once('#') {
                Some((class, method)) => {
                    config.value_provider = class.to_string();
                    config.value_provider_method = method.to_string();
                }
                None if !provider.is_empty() => config.value_provider = provider,
                None => {}
            }
        }
        if let Ok(classpath) = std::env::var(ENV_CLASSPATH) {
            if !classpath.is_empty() {
                config.classpath = Some(classpath);
            }
        }
        config
    }

    pub fn with_impl_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.impl_suffix = suffix.into();
        self
    }

    pub fn with_value_provider(mut self, class: impl Into<String>, method: impl Into<String>) -> Self {
        self.value_provider = class.into();
        self.value_provider_method = method.into();
        self
    }

    pub fn with_compiler_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compiler_options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignore_warnings(mut self, ignore: bool) -> Self {
        self.ignore_warnings = ignore;
        self
    }

    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn with_javac(mut self, javac: impl Into<PathBuf>) -> Self {
        self.javac = javac.into();
        self
    }

    pub fn with_classpath(mut self, classpath: impl Into<String>) -> Self {
        self.classpath = Some(classpath.into());
        self
    }

    /// Check that generated text built from this configuration can be valid
    pub fn validate(&self) -> Result<()> {
        if self.impl_suffix.is_empty() {
            return Err(Error::config_error("impl suffix must not be empty"));
        }
        if !self.impl_suffix.chars().all(is_identifier_part) {
            return Err(Error::config_error(format!(
                "impl suffix '{}' is not a valid identifier part",
                self.impl_suffix
            )));
        }
        if !is_qualified_name(&self.value_provider) {
            return Err(Error::config_error(format!(
                "value provider '{}' is not a qualified class name",
                self.value_provider
            )));
        }
        if !is_identifier(&self.value_provider_method) {
            return Err(Error::config_error(format!(
                "value provider method '{}' is not an identifier",
                self.value_provider_method
            )));
        }
        Ok(())
    }
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => chars.all(is_identifier_part),
        _ => false,
    }
}

fn is_qualified_name(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}
