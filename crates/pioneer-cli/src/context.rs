//! Composition root: wires the adapters into the core services.
//!
//! Services are shared behind `Arc` so that blocking scans can be moved onto
//! `tokio::task::spawn_blocking` without borrowing from `main`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use pioneer_adapters::{
    FsPackageManager, FsPlatformFactory, HttpFetcher, IniConfigLoader, LocalFilesystem,
    LogNotifier, ProcessRunner,
};
use pioneer_core::prelude::*;

use crate::{config::AppConfig, error::CliResult};

/// The services a command may need.
pub struct AppContext {
    /// Directory relative command-line paths are resolved against.
    pub cwd: PathBuf,
    pub catalog: Arc<ProjectCatalog>,
    pub configs: Arc<ConfigService>,
    pub environments: Arc<EnvironmentService>,
    pub scaffold: Arc<ScaffoldService>,
}

impl AppContext {
    /// `path` made absolute against [`AppContext::cwd`].
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if path == Path::new(".") {
            self.cwd.clone()
        } else {
            self.cwd.join(path)
        }
    }

    /// Build every service from the loaded settings.
    ///
    /// Relative configuration paths resolve against `cwd`.
    pub fn build(config: &AppConfig, cwd: PathBuf) -> CliResult<Self> {
        debug!(
            core_dir = %config.core_dir.display(),
            projects_dir = %config.projects_dir.display(),
            "Wiring services"
        );

        let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
        let loader: Arc<dyn ConfigLoader> = Arc::new(IniConfigLoader::new());
        let packages: Arc<dyn PackageManager> =
            Arc::new(FsPackageManager::new(&config.core_dir));
        let platforms: Arc<dyn PlatformFactory> = Arc::new(FsPlatformFactory::new(
            loader.clone(),
            FsPackageManager::new(&config.core_dir),
        ));
        let runner: Arc<dyn CoreRunner> = Arc::new(ProcessRunner::new(&config.pio_executable));
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(HttpFetcher::new()?);
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

        let caller = CallerContext {
            caller_id: config.caller_id.clone(),
            projects_dir: config.projects_dir.clone(),
        };

        Ok(Self {
            catalog: Arc::new(ProjectCatalog::new(
                loader.clone(),
                filesystem.clone(),
                packages.clone(),
            )),
            configs: Arc::new(ConfigService::new(
                loader.clone(),
                filesystem.clone(),
                cwd.clone(),
            )),
            environments: Arc::new(EnvironmentService::new(
                loader.clone(),
                filesystem.clone(),
                platforms,
                packages,
            )),
            scaffold: Arc::new(ScaffoldService::new(
                filesystem, loader, runner, fetcher, notifier, caller,
            )),
            cwd,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builds_against_empty_core_dir() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig {
            core_dir: tmp.path().join("core"),
            ..AppConfig::default()
        };
        let ctx = AppContext::build(&config, tmp.path().to_path_buf()).unwrap();
        assert!(ctx.catalog.examples().unwrap().is_empty());
        assert_eq!(ctx.absolute(Path::new(".")), tmp.path());
        assert_eq!(ctx.absolute(Path::new("blink")), tmp.path().join("blink"));
        assert_eq!(ctx.absolute(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
