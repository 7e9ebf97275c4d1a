// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Raised when a request or a piece of project data violates a rule that can
/// be checked without touching the filesystem or any installed package.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid project request: {0}")]
    InvalidRequest(String),

    #[error("Invalid environment name '{name}': {reason}")]
    InvalidEnvironmentName { name: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project directory: {path}")]
    PathEscapesRoot { path: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Unknown configuration method '{method}'")]
    UnknownConfigMethod { method: String },

    #[error("Bad arguments for '{method}': {reason}")]
    InvalidConfigArguments { method: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidRequest(msg) => vec![
                "Check the project request fields".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidEnvironmentName { name, .. } => vec![
                format!("'{}' cannot be used as an environment name", name),
                "Use letters, digits, '_' and '-' only".into(),
            ],
            Self::AbsolutePathNotAllowed { path } | Self::PathEscapesRoot { path } => vec![
                format!("Example file path '{}' must stay inside the project", path),
                "Use a relative path such as 'src/main.cpp'".into(),
            ],
            Self::MissingRequiredField { field } => {
                vec![format!("Provide a value for '{}'", field)]
            }
            Self::UnknownConfigMethod { .. } => vec![
                "Supported methods: sections, envs, has_section, has_option, options, get, \
                 get_list, items, default_envs, as_tuple, validate"
                    .into(),
            ],
            Self::InvalidConfigArguments { method, .. } => {
                vec![format!("Check the argument list passed to '{}'", method)]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownConfigMethod { .. } | Self::InvalidConfigArguments { .. } => {
                ErrorCategory::Configuration
            }
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
}
