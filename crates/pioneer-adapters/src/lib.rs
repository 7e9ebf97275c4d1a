//! Infrastructure adapters for Pioneer.
//!
//! This crate implements the ports defined in `pioneer-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod config;
pub mod filesystem;
pub mod packages;
pub mod remote;
pub mod runner;

// Re-export commonly used adapters
pub use config::{IniConfig, IniConfigLoader};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use packages::{FsPackageManager, FsPlatformFactory};
pub use remote::{HttpFetcher, LogNotifier};
pub use runner::ProcessRunner;
