//! Installed-package metadata as seen through the package-manager port.
//!
//! These types carry no on-disk format knowledge. Adapters read whatever the
//! package manager stores and map it into them.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of an installed package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    Platform,
    Tool,
    Library,
}

/// Identity the package manager assigned to an installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub kind: PackageKind,
    pub name: String,
    pub version: String,
    /// Registry owner, when the package was installed from the registry.
    pub owner: Option<String>,
}

/// A package present on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    pub path: PathBuf,
    pub metadata: PackageMetadata,
}

/// A framework a platform declares support for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkDecl {
    /// Name of the package implementing the framework, if any.
    pub package: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Parsed package manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub frameworks: BTreeMap<String, FrameworkDecl>,
    /// Board ids shipped with the package.
    pub boards: Vec<String>,
}

/// Full board definition resolved from a platform's board catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub id: String,
    pub name: String,
    pub platform: Option<String>,
    pub mcu: Option<String>,
    /// CPU frequency in Hz.
    pub fcpu: Option<u64>,
    /// RAM size in bytes.
    pub ram: Option<u64>,
    /// Flash size in bytes.
    pub rom: Option<u64>,
    pub frameworks: Vec<String>,
    pub vendor: Option<String>,
    pub url: Option<String>,
    pub connectivity: Vec<String>,
    /// Whether the board declares on-board or external debug tools.
    pub debug: bool,
    /// The untouched board manifest.
    pub raw: serde_json::Value,
}

impl BoardConfig {
    /// The subset of board data shown next to an environment.
    pub fn brief(&self) -> BoardBrief {
        BoardBrief {
            id: self.id.clone(),
            name: self.name.clone(),
            platform: self.platform.clone(),
            mcu: self.mcu.as_deref().map(str::to_uppercase),
            fcpu: self.fcpu,
            ram: self.ram,
            rom: self.rom,
            frameworks: self.frameworks.clone(),
            vendor: self.vendor.clone(),
            url: self.url.clone(),
            connectivity: self.connectivity.clone(),
            debug: self.debug,
        }
    }
}

/// Brief board data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardBrief {
    pub id: String,
    pub name: String,
    pub platform: Option<String>,
    pub mcu: Option<String>,
    pub fcpu: Option<u64>,
    pub ram: Option<u64>,
    pub rom: Option<u64>,
    pub frameworks: Vec<String>,
    pub vendor: Option<String>,
    pub url: Option<String>,
    pub connectivity: Vec<String>,
    pub debug: bool,
}
