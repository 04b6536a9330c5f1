//! Error types
//!
//! Defines domain-specific error types for the namespace engine and for
//! process startup.

use std::fmt;
use std::io;

/// Errors reported by the namespace engine.
///
/// Every variant is an expected, recoverable input error: the caller reports
/// it and keeps accepting commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// The source document holds an entry the loader cannot accept.
    CorruptFileSystem(String),
    /// A path segment does not exist in the directory being searched.
    NotFound(String),
    /// A file was used where a directory is required, or the other way round.
    WrongKind(String),
    /// A file or directory with the requested name already exists.
    NameCollision(String),
    /// `..` was applied to the root directory.
    CannotAscendAboveRoot,
    /// The requested entry name cannot be created.
    InvalidName(String),
}

impl fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceError::CorruptFileSystem(reason) => {
                write!(f, "Corrupt file system: {}", reason)
            }
            NamespaceError::NotFound(p) => write!(f, "No such file or directory: {}", p),
            NamespaceError::WrongKind(msg) => write!(f, "{}", msg),
            NamespaceError::NameCollision(p) => {
                write!(f, "A file or directory with that name already exists: {}", p)
            }
            NamespaceError::CannotAscendAboveRoot => {
                write!(f, "Cannot ascend above the root directory")
            }
            NamespaceError::InvalidName(name) => write!(f, "Invalid name: {:?}", name),
        }
    }
}

impl std::error::Error for NamespaceError {}

/// General error for everything that can stop the process from starting.
#[derive(Debug)]
pub enum DisyncError {
    Namespace(NamespaceError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for DisyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisyncError::Namespace(e) => write!(f, "Namespace error: {}", e),
            DisyncError::Config(e) => write!(f, "Configuration error: {}", e),
            DisyncError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for DisyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DisyncError::Namespace(e) => Some(e),
            DisyncError::Config(e) => Some(e),
            DisyncError::IoError(e) => Some(e),
        }
    }
}

impl From<NamespaceError> for DisyncError {
    fn from(error: NamespaceError) -> Self {
        DisyncError::Namespace(error)
    }
}

impl From<config::ConfigError> for DisyncError {
    fn from(error: config::ConfigError) -> Self {
        DisyncError::Config(error)
    }
}

impl From<io::Error> for DisyncError {
    fn from(error: io::Error) -> Self {
        DisyncError::IoError(error)
    }
}
