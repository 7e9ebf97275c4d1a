//! Installed-package adapters.

mod manager;
mod manifest;
mod platform;

pub use manager::FsPackageManager;
pub use platform::{FsPlatform, FsPlatformFactory, PlatformSpec};
