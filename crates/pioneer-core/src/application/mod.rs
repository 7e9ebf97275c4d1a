//! Application layer for Pioneer.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ConfigService, ProjectCatalog,
//!   ScaffoldService, EnvironmentService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    COPYING_EXAMPLE_MESSAGE, CallerContext, ConfigHandle, ConfigService, EnvironmentService,
    InitOptions, ProjectCatalog, ScaffoldOutcome, ScaffoldService, SkipReason,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ColorMode, ConfigLoader, ContentFetcher, CoreRunner, ExecOutput, Filesystem, Notification,
    Notifier, PackageManager, Platform, PlatformFactory, ProjectConfig, SpawnOptions,
};

pub use error::ApplicationError;
