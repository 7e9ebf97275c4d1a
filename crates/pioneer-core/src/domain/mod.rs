// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Pioneer.
//!
//! This module contains pure project logic. All filesystem, package and
//! process concerns are handled via ports (traits) defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Serializable shapes**: Every response type is `Serialize`
//! - **Immutable entities**: All domain objects are Clone + PartialEq
//!
// Public API - what the world sees
pub mod capabilities;
pub mod entities;
pub mod error;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    common::{RelativePath, base_name, path_to_name},
    config::{ConfigQuery, ConfigSection, ConfigTuple, ConfigValue, LoadMode},
    environment::{EnvironmentDescriptor, FrameworkInfo, PlatformInfo},
    example::{ExampleGroup, ExampleItem, PackageBrief},
    package::{
        BoardBrief, BoardConfig, FrameworkDecl, InstalledPackage, PackageKind, PackageManifest,
        PackageMetadata,
    },
    project::{BoardRef, LibStorage, ProjectFacts, ProjectSummary},
    request::{
        BoardSelection, ExampleFile, ExampleRequest, FrameworkSelection, PlatformRef,
        ProjectRequest, ProjectRequestBuilder,
    },
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{SourceKind, VersionPin};

pub use validation::DomainValidator;
