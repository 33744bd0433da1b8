//! Error types for the core library

use thiserror::Error;

/// The core error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Restore-after edges form a cycle
    #[error("Cyclic dependency: {unit} must restore after {dependency}, which is already being resolved")]
    CyclicDependency {
        /// Short name of the unit being resolved
        unit: Box<str>,
        /// Short name of the dependency found on the active path
        dependency: Box<str>,
    },
    /// A type key could not be unescaped
    #[error("Malformed type key: {0}")]
    MalformedKey(Box<str>),
    /// A field map could not be produced or interpreted
    #[error("Field error: {0}")]
    Fields(Box<str>),
    /// A state unit could not read from or write to its target
    #[error("Target error: {0}")]
    Target(Box<str>),
}

impl Error {
    /// Create a cycle error from the two conflicting type names
    pub fn cyclic(unit: impl Into<Box<str>>, dependency: impl Into<Box<str>>) -> Self {
        Error::CyclicDependency {
            unit: unit.into(),
            dependency: dependency.into(),
        }
    }

    /// Create a target error
    pub fn target(msg: impl Into<Box<str>>) -> Self {
        Error::Target(msg.into())
    }

    /// Check if this is a cycle error
    pub fn is_cycle(&self) -> bool {
        matches!(self, Error::CyclicDependency { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Fields(e.to_string().into_boxed_str())
    }
}

/// Result type alias
pub type Result<T> = core::result::Result<T, Error>;
