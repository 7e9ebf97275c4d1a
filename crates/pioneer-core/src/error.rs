//! Unified error handling for Pioneer Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with caller-facing codes and user-actionable suggestions.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Pioneer Core operations.
#[derive(Debug, Error, Clone)]
pub enum PioneerError {
    /// Errors from the domain layer (request/data rule violations).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl PioneerError {
    /// Shorthand for [`ApplicationError::Configuration`].
    pub fn configuration(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ApplicationError::Configuration {
            path: path.into(),
            reason: reason.into(),
        }
        .into()
    }

    /// Shorthand for [`ApplicationError::PackageResolution`].
    pub fn package_resolution(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        ApplicationError::PackageResolution {
            subject: subject.into(),
            reason: reason.into(),
        }
        .into()
    }

    /// Shorthand for [`ApplicationError::FilesystemError`].
    pub fn filesystem(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ApplicationError::FilesystemError {
            path: path.into(),
            reason: reason.into(),
        }
        .into()
    }

    /// Caller-facing numeric code, when the failure has one.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Application(e) => e.code(),
            _ => None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in Pioneer".into(),
                "Please report this issue with the command you ran".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether this is a configuration failure, wherever it was raised.
    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type PioneerResult<T> = Result<T, PioneerError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> PioneerResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> PioneerResult<T> {
        self.map_err(|e| PioneerError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
