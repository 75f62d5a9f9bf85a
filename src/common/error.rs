use thiserror::Error;

/// Result type for stubsynth operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for subtype synthesis and its supporting readers
#[derive(Error, Debug)]
pub enum Error {
    /// Compile, load or construction of a generated unit failed.
    /// `message` is the build service's diagnostic text, unaltered.
    #[error("cannot instantiate generated subtype of {target}: {message}")]
    InstantiationFailure { target: String, message: String },

    #[error("malformed signature '{signature}' at offset {position}: {message}")]
    Signature {
        signature: String,
        position: usize,
        message: String,
    },

    #[error("malformed thread dump at line {line}: {message}")]
    ThreadDump { line: usize, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Create an instantiation failure for `target` from any diagnostic
    pub fn instantiation_failure(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InstantiationFailure {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a signature error with the offending input and offset
    pub fn signature_error(signature: &str, position: usize, message: impl Into<String>) -> Self {
        Self::Signature {
            signature: signature.to_string(),
            position,
            message: message.into(),
        }
    }

    pub fn thread_dump_error(line: usize, message: impl Into<String>) -> Self {
        Self::ThreadDump { line, message: message.into() }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Diagnostic text carried by an instantiation failure
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::InstantiationFailure { message, .. } => Some(message),
            _ => None,
        }
    }
}
