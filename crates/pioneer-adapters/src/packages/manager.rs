//! Read-only view of the package manager's installation directory.

use std::path::{Path, PathBuf};

use pioneer_core::{
    application::ports::PackageManager,
    domain::{BoardConfig, InstalledPackage, PackageKind, PackageManifest},
    error::{PioneerError, PioneerResult},
};
use serde_json::Value;
use tracing::{debug, instrument};

use super::manifest::{
    BOARDS_DIR, METADATA_FILE, PACKAGE_MANIFESTS, PLATFORM_MANIFEST, PiopmFile, RawManifest,
    board_from_json,
};

const PLATFORMS_DIR: &str = "platforms";
const PACKAGES_DIR: &str = "packages";

/// Package index backed by `<core_dir>/platforms` and `<core_dir>/packages`.
#[derive(Debug, Clone)]
pub struct FsPackageManager {
    core_dir: PathBuf,
}

impl FsPackageManager {
    pub fn new(core_dir: impl Into<PathBuf>) -> Self {
        Self {
            core_dir: core_dir.into(),
        }
    }

    /// Installed tool and framework packages.
    pub fn installed_tools(&self) -> PioneerResult<Vec<InstalledPackage>> {
        self.scan(&self.core_dir.join(PACKAGES_DIR))
    }

    /// Installed platforms named `name`.
    pub fn platforms_named(&self, name: &str) -> PioneerResult<Vec<InstalledPackage>> {
        Ok(self
            .installed()?
            .into_iter()
            .filter(|p| p.metadata.name == name)
            .collect())
    }

    /// Board definition shipped by one platform package.
    pub fn platform_board(
        &self,
        platform: &InstalledPackage,
        board_id: &str,
    ) -> PioneerResult<Option<BoardConfig>> {
        let path = platform
            .path
            .join(BOARDS_DIR)
            .join(format!("{board_id}.json"));
        if !path.is_file() {
            return Ok(None);
        }
        let raw = read_json(&path, board_id)?;
        board_from_json(board_id, &platform.metadata.name, raw)
            .map(Some)
            .map_err(|e| PioneerError::package_resolution(board_id, format!("bad board file: {e}")))
    }

    fn scan(&self, root: &Path) -> PioneerResult<Vec<InstalledPackage>> {
        if !root.is_dir() {
            debug!(root = %root.display(), "Package directory missing");
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(root)
            .map_err(|e| PioneerError::filesystem(root, format!("Failed to list packages: {e}")))?;

        let mut packages = Vec::new();
        for entry in entries.flatten() {
            let dir = entry.path();
            if dir.is_dir() {
                if let Some(package) = self.package_at(&dir) {
                    packages.push(package);
                }
            }
        }
        packages.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(packages)
    }
}

impl PackageManager for FsPackageManager {
    #[instrument(skip(self), fields(core_dir = %self.core_dir.display()))]
    fn installed(&self) -> PioneerResult<Vec<InstalledPackage>> {
        Ok(self
            .scan(&self.core_dir.join(PLATFORMS_DIR))?
            .into_iter()
            .filter(|p| p.metadata.kind == PackageKind::Platform)
            .collect())
    }

    fn package_at(&self, dir: &Path) -> Option<InstalledPackage> {
        let path = dir.join(METADATA_FILE);
        let text = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<PiopmFile>(&text) {
            Ok(meta) => meta.into_package(dir),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Unreadable package metadata");
                None
            }
        }
    }

    fn load_manifest(&self, package: &InstalledPackage) -> PioneerResult<PackageManifest> {
        let name = &package.metadata.name;
        let candidates: &[&str] = match package.metadata.kind {
            PackageKind::Platform => &[PLATFORM_MANIFEST],
            _ => PACKAGE_MANIFESTS,
        };
        let Some(path) = candidates
            .iter()
            .map(|file| package.path.join(file))
            .find(|p| p.is_file())
        else {
            return Err(PioneerError::package_resolution(
                name,
                format!("no manifest in {}", package.path.display()),
            ));
        };

        let raw: RawManifest = serde_json::from_value(read_json(&path, name)?)
            .map_err(|e| PioneerError::package_resolution(name, format!("bad manifest: {e}")))?;
        Ok(raw.into_manifest(board_ids(&package.path.join(BOARDS_DIR))))
    }

    fn board_config(&self, board_id: &str) -> PioneerResult<BoardConfig> {
        for platform in self.installed()? {
            if let Some(board) = self.platform_board(&platform, board_id)? {
                return Ok(board);
            }
        }
        Err(PioneerError::package_resolution(
            board_id,
            "unknown board, no installed platform defines it",
        ))
    }
}

fn read_json(path: &Path, subject: &str) -> PioneerResult<Value> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| PioneerError::filesystem(path, format!("Failed to read file: {e}")))?;
    serde_json::from_str(&text).map_err(|e| {
        PioneerError::package_resolution(subject, format!("{}: {e}", path.display()))
    })
}

/// Board ids from the `*.json` files in `dir`, sorted.
fn board_ids(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut ids: Vec<String> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .collect();
    ids.sort();
    ids
}
