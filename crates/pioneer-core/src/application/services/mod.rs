//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "list recent projects" or "create a project".

pub mod config_service;
pub mod environment_service;
pub mod project_catalog;
pub mod scaffold_service;
pub mod scan;

pub use config_service::{ConfigHandle, ConfigService};
pub use environment_service::EnvironmentService;
pub use project_catalog::ProjectCatalog;
pub use scaffold_service::{
    COPYING_EXAMPLE_MESSAGE, CallerContext, InitOptions, ScaffoldOutcome, ScaffoldService,
};
pub use scan::{SkipReason, collect_skipping};
