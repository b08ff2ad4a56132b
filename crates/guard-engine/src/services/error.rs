//! Engine layer error types
//!
//! Provides a unified error type for all engine operations.

use guard_core::DomainError;
use std::fmt;

/// Engine layer error type
#[derive(Debug)]
pub enum EngineError {
    /// Domain rule violation
    Domain(DomainError),

    /// Validation error
    Validation(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl EngineError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the error code for logs
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a transient infrastructure failure worth redelivery
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_transient())
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
