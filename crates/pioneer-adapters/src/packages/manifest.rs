//! On-disk shapes of the package manager's metadata files.
//!
//! Every installed package directory carries a `.piopm` file written by the
//! package manager. Platforms describe themselves in `platform.json`,
//! everything else in `package.json` (or `library.json` for libraries).
//! Board definitions live in `<platform>/boards/<id>.json`.

use std::collections::BTreeMap;
use std::path::Path;

use pioneer_core::domain::{
    BoardConfig, FrameworkDecl, InstalledPackage, PackageKind, PackageManifest, PackageMetadata,
};
use serde::Deserialize;
use serde_json::Value;

pub(crate) const METADATA_FILE: &str = ".piopm";
pub(crate) const PLATFORM_MANIFEST: &str = "platform.json";
pub(crate) const PACKAGE_MANIFESTS: &[&str] = &["package.json", "library.json"];
pub(crate) const BOARDS_DIR: &str = "boards";

#[derive(Debug, Deserialize)]
pub(crate) struct PiopmFile {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    version: String,
    #[serde(default)]
    spec: Option<PiopmSpec>,
}

#[derive(Debug, Default, Deserialize)]
struct PiopmSpec {
    #[serde(default)]
    owner: Option<String>,
}

impl PiopmFile {
    /// The package this metadata describes, or `None` for a kind we do not
    /// track.
    pub(crate) fn into_package(self, path: &Path) -> Option<InstalledPackage> {
        let kind = match self.kind.as_str() {
            "platform" => PackageKind::Platform,
            "tool" => PackageKind::Tool,
            "library" => PackageKind::Library,
            _ => return None,
        };
        Some(InstalledPackage {
            path: path.to_path_buf(),
            metadata: PackageMetadata {
                kind,
                name: self.name,
                version: self.version,
                owner: self.spec.and_then(|s| s.owner),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawManifest {
    name: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    frameworks: BTreeMap<String, FrameworkDecl>,
}

impl RawManifest {
    pub(crate) fn into_manifest(self, boards: Vec<String>) -> PackageManifest {
        PackageManifest {
            title: self.title.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            version: self.version.unwrap_or_default(),
            description: self.description,
            frameworks: self.frameworks,
            boards,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawBoard {
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    vendor: Option<String>,
    #[serde(default)]
    frameworks: Vec<String>,
    #[serde(default)]
    build: RawBuild,
    #[serde(default)]
    upload: RawUpload,
    #[serde(default)]
    connectivity: Vec<String>,
    #[serde(default)]
    debug: Option<RawDebug>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBuild {
    #[serde(default)]
    mcu: Option<String>,
    #[serde(default)]
    f_cpu: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUpload {
    #[serde(default)]
    maximum_ram_size: Option<u64>,
    #[serde(default)]
    maximum_size: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDebug {
    #[serde(default)]
    tools: BTreeMap<String, Value>,
}

/// Build a [`BoardConfig`] from a board manifest.
pub(crate) fn board_from_json(
    id: &str,
    platform: &str,
    raw: Value,
) -> Result<BoardConfig, serde_json::Error> {
    let board: RawBoard = serde_json::from_value(raw.clone())?;
    Ok(BoardConfig {
        id: id.to_string(),
        name: board.name,
        platform: Some(platform.to_string()),
        mcu: board.build.mcu,
        fcpu: board.build.f_cpu.as_deref().and_then(parse_frequency),
        ram: board.upload.maximum_ram_size,
        rom: board.upload.maximum_size,
        frameworks: board.frameworks,
        vendor: board.vendor,
        url: board.url,
        connectivity: board.connectivity,
        debug: board.debug.is_some_and(|d| !d.tools.is_empty()),
        raw,
    })
}

/// `"240000000L"` -> 240000000
fn parse_frequency(text: &str) -> Option<u64> {
    text.trim()
        .trim_end_matches(['L', 'l', 'U', 'u'])
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn board_manifest_maps_to_config() {
        let raw = json!({
            "name": "Espressif ESP32 Dev Module",
            "vendor": "Espressif",
            "url": "https://en.wikipedia.org/wiki/ESP32",
            "frameworks": ["arduino", "espidf"],
            "build": {"mcu": "esp32", "f_cpu": "240000000L"},
            "upload": {"maximum_ram_size": 327680, "maximum_size": 4194304},
            "connectivity": ["wifi", "bluetooth"],
            "debug": {"tools": {"esp-prog": {}}}
        });

        let board = board_from_json("esp32dev", "espressif32", raw).unwrap();
        assert_eq!(board.fcpu, Some(240_000_000));
        assert_eq!(board.ram, Some(327_680));
        assert_eq!(board.platform.as_deref(), Some("espressif32"));
        assert!(board.debug);
        assert_eq!(board.brief().mcu.as_deref(), Some("ESP32"));
    }

    #[test]
    fn board_without_debug_tools_is_not_debuggable() {
        let board = board_from_json("uno", "atmelavr", json!({"name": "Arduino Uno"})).unwrap();
        assert!(!board.debug);
        assert_eq!(board.fcpu, None);
    }

    #[test]
    fn manifest_title_defaults_to_name() {
        let raw: RawManifest = serde_json::from_value(json!({"name": "native"})).unwrap();
        let manifest = raw.into_manifest(vec![]);
        assert_eq!(manifest.title, "native");
        assert!(manifest.frameworks.is_empty());
    }

    #[test]
    fn unknown_package_kind_is_ignored() {
        let meta: PiopmFile =
            serde_json::from_value(json!({"type": "firmware", "name": "x", "version": "1.0.0"}))
                .unwrap();
        assert!(meta.into_package(Path::new("/p")).is_none());
    }
}
