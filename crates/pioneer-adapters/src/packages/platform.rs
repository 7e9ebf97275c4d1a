//! Resolve the development platform an environment builds with.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pioneer_core::{
    application::ports::{ConfigLoader, PackageManager, Platform, PlatformFactory},
    domain::{
        BoardConfig, FrameworkDecl, InstalledPackage, LoadMode, PackageManifest,
        value_objects::{CONFIG_FILE_NAME, env_section},
    },
    error::{PioneerError, PioneerResult},
};
use semver::{Version, VersionReq};
use tracing::{debug, instrument, warn};

use super::manager::FsPackageManager;

/// What an env's `platform` option asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSpec {
    pub owner: Option<String>,
    pub name: String,
    pub requirement: Option<VersionReq>,
}

impl PlatformSpec {
    /// Parse `[owner/]name[ @ requirement]`.
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.contains("://") {
            return Err(format!("'{text}' is a URL; only registry platforms are resolved"));
        }
        let (id, requirement) = match text.split_once('@') {
            Some((id, req)) => {
                let req = req.trim();
                let parsed = VersionReq::parse(req)
                    .map_err(|e| format!("bad version requirement '{req}': {e}"))?;
                (id.trim(), Some(parsed))
            }
            None => (text, None),
        };
        let (owner, name) = match id.split_once('/') {
            Some((owner, name)) => (Some(owner.trim().to_string()), name.trim()),
            None => (None, id),
        };
        if name.is_empty() {
            return Err(format!("'{text}' names no platform"));
        }
        Ok(Self {
            owner,
            name: name.to_string(),
            requirement,
        })
    }

    fn accepts(&self, package: &InstalledPackage) -> bool {
        if let (Some(owner), Some(installed)) = (&self.owner, &package.metadata.owner) {
            if owner != installed {
                return false;
            }
        }
        match &self.requirement {
            None => true,
            Some(req) => Version::parse(&package.metadata.version)
                .map(|v| req.matches(&v))
                .unwrap_or(false),
        }
    }
}

/// Creates [`FsPlatform`]s from project configuration.
pub struct FsPlatformFactory {
    loader: Arc<dyn ConfigLoader>,
    packages: FsPackageManager,
}

impl FsPlatformFactory {
    pub fn new(loader: Arc<dyn ConfigLoader>, packages: FsPackageManager) -> Self {
        Self { loader, packages }
    }

    /// Highest installed version satisfying `spec`.
    pub fn best_match(&self, spec: &PlatformSpec) -> PioneerResult<Option<InstalledPackage>> {
        let mut candidates: Vec<(Option<Version>, InstalledPackage)> = self
            .packages
            .platforms_named(&spec.name)?
            .into_iter()
            .filter(|p| spec.accepts(p))
            .map(|p| (Version::parse(&p.metadata.version).ok(), p))
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(candidates.pop().map(|(_, p)| p))
    }
}

impl PlatformFactory for FsPlatformFactory {
    #[instrument(skip(self), fields(project_dir = %project_dir.display()))]
    fn from_env(
        &self,
        project_dir: &Path,
        env: &str,
        autoinstall: bool,
    ) -> PioneerResult<Box<dyn Platform>> {
        let config_path = project_dir.join(CONFIG_FILE_NAME);
        let config = self.loader.open(&config_path, LoadMode::Full)?;
        let section = env_section(env);
        let Some(text) = config.get_string(&section, "platform")? else {
            return Err(PioneerError::configuration(
                &config_path,
                format!("[{section}] has no 'platform' option"),
            ));
        };

        let spec = PlatformSpec::parse(&text)
            .map_err(|reason| PioneerError::package_resolution(&text, reason))?;
        let Some(package) = self.best_match(&spec)? else {
            if autoinstall {
                warn!(platform = %text, "Platform is not installed and cannot be installed from here");
            }
            return Err(PioneerError::package_resolution(
                &text,
                "no installed platform satisfies the requirement",
            ));
        };

        let manifest = self.packages.load_manifest(&package)?;
        debug!(
            platform = %package.metadata.name,
            version = %package.metadata.version,
            "Platform resolved"
        );
        Ok(Box::new(FsPlatform {
            package,
            manifest,
            packages: self.packages.clone(),
        }))
    }
}

/// An installed platform and its manifest.
#[derive(Debug, Clone)]
pub struct FsPlatform {
    package: InstalledPackage,
    manifest: PackageManifest,
    packages: FsPackageManager,
}

impl Platform for FsPlatform {
    fn name(&self) -> String {
        self.manifest.name.clone()
    }

    fn title(&self) -> String {
        self.manifest.title.clone()
    }

    fn dir(&self) -> PathBuf {
        self.package.path.clone()
    }

    fn frameworks(&self) -> BTreeMap<String, FrameworkDecl> {
        self.manifest.frameworks.clone()
    }

    fn get_package(&self, name: &str) -> Option<InstalledPackage> {
        match self.packages.installed_tools() {
            Ok(tools) => tools.into_iter().find(|p| p.metadata.name == name),
            Err(e) => {
                debug!(package = name, error = %e, "Package lookup failed");
                None
            }
        }
    }

    fn load_manifest(&self, package: &InstalledPackage) -> PioneerResult<PackageManifest> {
        self.packages.load_manifest(package)
    }

    fn board_config(&self, board_id: &str) -> PioneerResult<BoardConfig> {
        self.packages
            .platform_board(&self.package, board_id)?
            .ok_or_else(|| {
                PioneerError::package_resolution(
                    board_id,
                    format!("unknown board for platform {}", self.manifest.name),
                )
            })
    }
}
