//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `pioneer-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `ConfigLoader` / `ProjectConfig`: `platformio.ini` access
//!   - `PackageManager`, `PlatformFactory`, `Platform`: installed package metadata
//!   - `CoreRunner`: the external build tool
//!   - `ContentFetcher`, `Notifier`: example downloads and progress messages
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    ColorMode, ConfigLoader, ContentFetcher, CoreRunner, ExecOutput, Filesystem, Notification,
    Notifier, PackageManager, Platform, PlatformFactory, ProjectConfig, SpawnOptions,
};
