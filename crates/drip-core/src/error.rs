//! Error types for the brew timer library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::SessionState;

/// Comprehensive error type for all brew timer operations.
#[derive(Error, Debug)]
pub enum BrewError {
    /// The alarm or notification facility refused a request
    #[error("Permission denied while scheduling alarm {key}")]
    PermissionDenied { key: usize },
    /// An engine operation was called in a state that does not allow it
    #[error("Cannot {operation} while the timer is {state}")]
    StateViolation {
        operation: &'static str,
        state: SessionState,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// The background driver task has exited
    #[error("Brew driver is no longer running")]
    DriverStopped,
}

/// Builder for creating state violation errors.
pub struct StateViolationBuilder {
    operation: &'static str,
}

impl StateViolationBuilder {
    /// Create a new state violation builder for an operation.
    pub fn new(operation: &'static str) -> Self {
        Self { operation }
    }

    /// Build the error for the state the timer was in.
    pub fn in_state(self, state: SessionState) -> BrewError {
        BrewError::StateViolation {
            operation: self.operation,
            state,
        }
    }
}

impl BrewError {
    /// Creates a builder for state violation errors.
    pub fn state_violation(operation: &'static str) -> StateViolationBuilder {
        StateViolationBuilder::new(operation)
    }

    /// Creates a configuration error from any displayable message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the error is a caller contract violation rather than a
    /// recoverable runtime failure.
    pub fn is_state_violation(&self) -> bool {
        matches!(self, Self::StateViolation { .. })
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to BrewError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| BrewError::Configuration {
            message: format!("{}: {}", context, e),
        })
    }
}

/// Result type alias for brew timer operations
pub type Result<T> = std::result::Result<T, BrewError>;
