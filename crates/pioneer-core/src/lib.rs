//! Pioneer Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Pioneer, the
//! project orchestration layer of an embedded-development toolchain. It
//! follows hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           pioneer-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ConfigService, ProjectCatalog,        │
//! │   ScaffoldService, EnvironmentService)  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, ConfigLoader, CoreRunner,  │
//! │  PackageManager, PlatformFactory, ...)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    pioneer-adapters (Infrastructure)    │
//! │ (IniConfigLoader, FsPackageManager,     │
//! │  ProcessRunner, LocalFilesystem, ...)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ProjectRequest, ProjectSummary,        │
//! │  EnvironmentDescriptor, ConfigQuery)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pioneer_core::{application::{InitOptions, ScaffoldService}, domain::ProjectRequest};
//!
//! # async fn run(service: ScaffoldService) -> pioneer_core::error::PioneerResult<()> {
//! let request = ProjectRequest::builder()
//!     .location("/home/dev/Projects")
//!     .name("blink")
//!     .platform("atmelavr", "4.2.0")
//!     .board("uno")
//!     .framework("arduino")
//!     .build()?;
//!
//! let outcome = service.init_v2(&request, &InitOptions::default()).await?;
//! println!("created {}", outcome.project_dir.display());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CallerContext, ConfigHandle, ConfigService, EnvironmentService, InitOptions,
        ProjectCatalog, ScaffoldOutcome, ScaffoldService, SkipReason,
        ports::{
            ColorMode, ConfigLoader, ContentFetcher, CoreRunner, ExecOutput, Filesystem,
            Notification, Notifier, PackageManager, Platform, PlatformFactory, ProjectConfig,
            SpawnOptions,
        },
    };
    pub use crate::domain::{
        ConfigQuery, ConfigSection, ConfigTuple, ConfigValue, EnvironmentDescriptor,
        ExampleGroup, LoadMode, ProjectRequest, ProjectSummary,
    };
    pub use crate::error::{PioneerError, PioneerResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
