//! Common utilities and definitions shared across modules
//!
//! Errors, configuration and classpath resolution used by the synthesizer,
//! the build bridge and the factory.

pub mod classpath;
pub mod config;
pub mod error;

// Re-export commonly used items for convenience
pub use classpath::{ClassPath, ClasspathResolver};
pub use config::Config;
pub use error::{Error, Result};
