//! Application layer errors.
//!
//! These errors represent failures in orchestration, not domain rules.
//! Domain rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::SourceKind;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Directory lacks the canonical configuration file.
    #[error("Not a PlatformIO project: {}", path.display())]
    NotAProject { path: PathBuf },

    /// Import source does not have the expected layout.
    #[error("Not an {kind} project: {}", path.display())]
    InvalidSourceProject { kind: SourceKind, path: PathBuf },

    /// Configuration file could not be read, parsed, validated or saved.
    #[error("Configuration error in {}: {reason}", path.display())]
    Configuration { path: PathBuf, reason: String },

    /// Board, platform or framework metadata missing or unresolvable.
    #[error("Could not resolve {subject}: {reason}")]
    PackageResolution { subject: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// The external build tool could not be started or exited unsuccessfully.
    #[error("`{command}` failed: {reason}")]
    ExternalTool { command: String, reason: String },

    /// Remote content for an example file could not be fetched.
    #[error("Could not fetch {url}: {reason}")]
    ContentFetch { url: String, reason: String },

    /// Shared adapter state was poisoned.
    #[error("Adapter state is unavailable")]
    AdapterLockError,
}

impl ApplicationError {
    /// Caller-facing numeric code for failures a front end reacts to.
    pub const fn code(&self) -> Option<u16> {
        match self {
            Self::InvalidSourceProject {
                kind: SourceKind::Arduino,
                ..
            } => Some(4000),
            Self::InvalidSourceProject {
                kind: SourceKind::PlatformIO,
                ..
            } => Some(4001),
            Self::NotAProject { .. } => Some(4002),
            _ => None,
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotAProject { path } => vec![
                format!("No platformio.ini found in {}", path.display()),
                "Pass the project root directory, not a subdirectory".into(),
            ],
            Self::InvalidSourceProject {
                kind: SourceKind::Arduino,
                path,
            } => vec![
                format!(
                    "Expected a sketch named after the folder inside {}",
                    path.display()
                ),
                "Arduino sketches use the .ino or .pde extension".into(),
            ],
            Self::InvalidSourceProject {
                kind: SourceKind::PlatformIO,
                path,
            } => vec![
                format!("{} has no platformio.ini", path.display()),
                "Use the Arduino import for sketch folders".into(),
            ],
            Self::Configuration { path, .. } => vec![
                format!("Check the syntax of {}", path.display()),
                "Every environment needs an [env:NAME] section".into(),
            ],
            Self::PackageResolution { subject, .. } => vec![
                format!("Install the package providing {}", subject),
                "Try: pio pkg install".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ExternalTool { .. } => vec![
                "Ensure the build tool is installed and in your PATH".into(),
                "Check the command output above for details".into(),
            ],
            Self::ContentFetch { url, .. } => vec![
                format!("Check that {} is reachable", url),
                "Retry once the network is available".into(),
            ],
            Self::AdapterLockError => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotAProject { .. } | Self::InvalidSourceProject { .. } => {
                ErrorCategory::Validation
            }
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::PackageResolution { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. }
            | Self::ExternalTool { .. }
            | Self::ContentFetch { .. }
            | Self::AdapterLockError => ErrorCategory::Internal,
        }
    }
}
