//! Build-and-load boundary
//!
//! The service that turns generated source into an instantiable unit is
//! external to this crate; it is reached through [`BuildBridge`] and
//! [`CompiledUnit`]. Errors at this seam are plain `anyhow` errors carrying
//! the service's diagnostics; the factory folds them into
//! `Error::InstantiationFailure`.

pub mod javac;

pub use javac::{ClassImage, CompiledClasses, DefinedClass, InMemoryClassLoader, JavacBridge};

use crate::common::classpath::ClassPath;

/// One compilation handed to the build service
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Binary name of the unit's primary type
    pub unit_name: &'a str,
    pub source: &'a str,
    /// Classpath of the loader that defined the target
    pub parent: &'a ClassPath,
    pub options: &'a [String],
    pub ignore_warnings: bool,
}

/// Compiles and loads generated source
pub trait BuildBridge: Send + Sync {
    type Unit: CompiledUnit;

    fn compile(&self, request: &CompileRequest<'_>) -> anyhow::Result<Self::Unit>;
}

/// A compiled, loaded unit that can produce instances of its primary type
pub trait CompiledUnit: Send + Sync {
    type Instance;

    fn name(&self) -> &str;

    fn new_instance(&self) -> anyhow::Result<Self::Instance>;
}
