//! Environment Service - describes one build environment of a project.
//!
//! Reconciles what the environment asks for (board, frameworks) with what
//! the installed platform actually provides.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ConfigLoader, Filesystem, PackageManager, Platform, PlatformFactory},
    },
    domain::{
        DomainValidator as validator, EnvironmentDescriptor, FrameworkInfo, LoadMode, PlatformInfo,
        value_objects::{CONFIG_FILE_NAME, env_section},
    },
    error::{PioneerError, PioneerResult},
};

/// Builds [`EnvironmentDescriptor`]s.
pub struct EnvironmentService {
    loader: Arc<dyn ConfigLoader>,
    filesystem: Arc<dyn Filesystem>,
    platforms: Arc<dyn PlatformFactory>,
    packages: Arc<dyn PackageManager>,
}

impl EnvironmentService {
    pub fn new(
        loader: Arc<dyn ConfigLoader>,
        filesystem: Arc<dyn Filesystem>,
        platforms: Arc<dyn PlatformFactory>,
        packages: Arc<dyn PackageManager>,
    ) -> Self {
        Self {
            loader,
            filesystem,
            platforms,
            packages,
        }
    }

    /// Describe environment `env` of the project at `project_dir`.
    ///
    /// Frameworks the platform does not declare, or whose backing package is
    /// not installed, are left out. When none remain `frameworks` is `None`.
    #[instrument(skip(self), fields(project_dir = %project_dir.display()))]
    pub fn describe(&self, project_dir: &Path, env: &str) -> PioneerResult<EnvironmentDescriptor> {
        let config_path = project_dir.join(CONFIG_FILE_NAME);
        if !self.filesystem.is_file(&config_path) {
            return Err(ApplicationError::NotAProject {
                path: project_dir.to_path_buf(),
            }
            .into());
        }
        validator::validate_env_name(env)?;

        let config = self.loader.open(&config_path, LoadMode::Full)?;
        let platform = self.platforms.from_env(project_dir, env, true)?;

        let platform_dir = platform.dir();
        let platform_pkg = self.packages.package_at(&platform_dir).ok_or_else(|| {
            PioneerError::package_resolution(
                format!("platform {}", platform.name()),
                format!("no installed package at {}", platform_dir.display()),
            )
        })?;

        let section = env_section(env);
        let board = match config.get_string(&section, "board")? {
            Some(id) if !id.is_empty() => Some(platform.board_config(&id)?.brief()),
            _ => None,
        };
        let frameworks = resolve_frameworks(
            platform.as_ref(),
            config.get_list(&section, "framework")?,
        )?;

        Ok(EnvironmentDescriptor::new(
            PlatformInfo {
                ownername: platform_pkg.metadata.owner,
                name: platform.name(),
                title: platform.title(),
                version: platform_pkg.metadata.version,
            },
            board,
            frameworks,
        ))
    }
}

fn resolve_frameworks(
    platform: &dyn Platform,
    requested: Vec<String>,
) -> PioneerResult<Vec<FrameworkInfo>> {
    let declared = platform.frameworks();
    let mut resolved = Vec::new();

    for name in requested {
        let Some(package_name) = declared.get(&name).and_then(|d| d.package.as_deref()) else {
            debug!(framework = %name, "Not declared by platform or no backing package");
            continue;
        };
        let Some(package) = platform.get_package(package_name) else {
            debug!(framework = %name, package = package_name, "Backing package not installed");
            continue;
        };
        let manifest = platform.load_manifest(&package)?;
        resolved.push(FrameworkInfo {
            name,
            title: Some(manifest.title).filter(|t| !t.is_empty()),
            version: package.metadata.version,
        });
    }
    Ok(resolved)
}
