//! Project Catalog - aggregates project and example directories.
//!
//! Two scans:
//! 1. Recent projects: a caller-supplied list of project roots
//! 2. Examples: `examples/` trees shipped inside installed packages
//!
//! Both are best-effort. A candidate that cannot be read is skipped, never
//! reported as an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ports::{ConfigLoader, Filesystem, PackageManager, ProjectConfig},
        services::scan::{SkipReason, collect_skipping},
    },
    domain::{
        BoardRef, ExampleGroup, ExampleItem, InstalledPackage, LibStorage, LoadMode, PackageBrief,
        ProjectFacts, ProjectSummary,
        value_objects::{
            CONFIG_FILE_NAME, DEFAULT_WORKSPACE_DIR, EXAMPLES_DIR_NAME, ROOT_SECTION, env_name,
        },
    },
    error::PioneerResult,
};

/// Scans project directories and package example trees.
pub struct ProjectCatalog {
    loader: Arc<dyn ConfigLoader>,
    filesystem: Arc<dyn Filesystem>,
    packages: Arc<dyn PackageManager>,
}

impl ProjectCatalog {
    pub fn new(
        loader: Arc<dyn ConfigLoader>,
        filesystem: Arc<dyn Filesystem>,
        packages: Arc<dyn PackageManager>,
    ) -> Self {
        Self {
            loader,
            filesystem,
            packages,
        }
    }

    /// Summaries of the given project roots, in input order.
    ///
    /// Missing directories and projects whose configuration fails to load
    /// are left out.
    #[instrument(skip_all, fields(candidates = dirs.len()))]
    pub fn recent_projects(&self, dirs: &[PathBuf]) -> Vec<ProjectSummary> {
        let summaries = collect_skipping(self.scan_recent(dirs));
        info!(found = summaries.len(), "Recent projects scanned");
        summaries
    }

    /// Lazy form of [`ProjectCatalog::recent_projects`].
    pub fn scan_recent<'a>(
        &'a self,
        dirs: &'a [PathBuf],
    ) -> impl Iterator<Item = Result<ProjectSummary, SkipReason>> + 'a {
        dirs.iter().map(|dir| self.summarize(dir))
    }

    /// Example groups of every installed package, ordered by package title.
    #[instrument(skip_all)]
    pub fn examples(&self) -> PioneerResult<Vec<ExampleGroup>> {
        let packages = self.packages.installed()?;
        let mut groups = collect_skipping(packages.iter().map(|pkg| self.example_group(pkg)));
        groups.sort_by(|a, b| a.platform.title.cmp(&b.platform.title));
        info!(groups = groups.len(), "Examples scanned");
        Ok(groups)
    }

    // -------------------------------------------------------------------------
    // Recent projects
    // -------------------------------------------------------------------------

    fn summarize(&self, dir: &Path) -> Result<ProjectSummary, SkipReason> {
        if !self.filesystem.is_dir(dir) {
            return Err(SkipReason::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }

        let unloadable = |e: crate::error::PioneerError| SkipReason::Unloadable {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        };
        let facts = self.read_facts(dir).map_err(unloadable)?;
        let modified = self.filesystem.modified(dir).map_err(unloadable)?;

        let boards = facts
            .board_ids
            .iter()
            .map(|id| self.board_ref(id))
            .collect();
        let env_lib_storages = self
            .existing_dirs(dir, &facts.env_libdeps_dirs)
            .iter()
            .map(|p| LibStorage::for_env(p))
            .collect();
        let extra_lib_storages = self
            .existing_dirs(dir, &facts.lib_extra_dirs)
            .iter()
            .map(|p| LibStorage::extra(p))
            .collect();

        Ok(ProjectSummary {
            path: dir.to_path_buf(),
            name: crate::domain::path_to_name(dir),
            modified,
            boards,
            description: facts.description,
            envs: facts.envs,
            env_lib_storages,
            extra_lib_storages,
        })
    }

    fn read_facts(&self, dir: &Path) -> PioneerResult<ProjectFacts> {
        let config = self
            .loader
            .open(&dir.join(CONFIG_FILE_NAME), LoadMode::Full)?;
        let config = config.as_ref();

        let mut facts = ProjectFacts {
            envs: config.envs(),
            description: config.get_string(ROOT_SECTION, "description")?,
            lib_extra_dirs: to_paths(config.get_list(ROOT_SECTION, "lib_extra_dirs")?),
            ..ProjectFacts::default()
        };

        let libdeps_dir = libdeps_dir(config)?;
        for section in config.sections() {
            let Some(env) = env_name(&section) else {
                continue;
            };
            facts.env_libdeps_dirs.push(libdeps_dir.join(env));
            if let Some(board) = config.get_string(&section, "board")? {
                facts.board_ids.push(board);
            }
            facts
                .lib_extra_dirs
                .extend(to_paths(config.get_list(&section, "lib_extra_dirs")?));
        }
        Ok(facts)
    }

    fn board_ref(&self, id: &str) -> BoardRef {
        match self.packages.board_config(id) {
            Ok(board) => BoardRef {
                id: id.to_string(),
                name: board.name,
            },
            Err(e) => {
                debug!(board = id, error = %e, "Board name unresolved, keeping id");
                BoardRef::unresolved(id)
            }
        }
    }

    /// Expand `~`, anchor relative paths at `project_dir` and keep only
    /// directories that exist.
    fn existing_dirs(&self, project_dir: &Path, dirs: &[PathBuf]) -> Vec<PathBuf> {
        dirs.iter()
            .map(|d| self.normalize(project_dir, d))
            .filter(|d| self.filesystem.is_dir(d))
            .collect()
    }

    fn normalize(&self, project_dir: &Path, dir: &Path) -> PathBuf {
        if let Ok(rest) = dir.strip_prefix("~") {
            if let Some(home) = self.filesystem.home_dir() {
                return home.join(rest);
            }
        }
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            project_dir.join(dir)
        }
    }

    // -------------------------------------------------------------------------
    // Examples
    // -------------------------------------------------------------------------

    fn example_group(&self, package: &InstalledPackage) -> Result<ExampleGroup, SkipReason> {
        let name = package.metadata.name.clone();
        let root = package.path.join(EXAMPLES_DIR_NAME);
        if !self.filesystem.is_dir(&root) {
            return Err(SkipReason::NoExamples { package: name });
        }

        let dirs = self
            .filesystem
            .walk_dirs(&root)
            .map_err(|e| SkipReason::Unloadable {
                path: root.clone(),
                reason: e.to_string(),
            })?;
        let items = collect_skipping(dirs.iter().map(|dir| self.example_item(&root, dir)));
        if items.is_empty() {
            return Err(SkipReason::NoExamples { package: name });
        }

        let manifest = self
            .packages
            .load_manifest(package)
            .map_err(|e| SkipReason::ManifestUnavailable {
                package: name,
                reason: e.to_string(),
            })?;

        Ok(ExampleGroup::new(
            PackageBrief {
                title: manifest.title,
                version: manifest.version,
            },
            items,
        ))
    }

    fn example_item(&self, root: &Path, dir: &Path) -> Result<ExampleItem, SkipReason> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if !self.filesystem.is_file(&config_path) {
            return Err(SkipReason::NotAProject {
                path: dir.to_path_buf(),
            });
        }

        let description = self
            .loader
            .open(&config_path, LoadMode::Full)
            .and_then(|config| {
                config.validate(true)?;
                config.get_string(ROOT_SECTION, "description")
            })
            .map_err(|e| SkipReason::Unloadable {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;

        ExampleItem::new(root, dir, description).ok_or_else(|| SkipReason::NotAProject {
            path: dir.to_path_buf(),
        })
    }
}

/// `platformio.libdeps_dir`, defaulting to `<workspace_dir>/libdeps`.
fn libdeps_dir(config: &dyn ProjectConfig) -> PioneerResult<PathBuf> {
    if let Some(dir) = config.get_string(ROOT_SECTION, "libdeps_dir")? {
        return Ok(PathBuf::from(dir));
    }
    let workspace = config
        .get_string(ROOT_SECTION, "workspace_dir")?
        .unwrap_or_else(|| DEFAULT_WORKSPACE_DIR.to_string());
    Ok(PathBuf::from(workspace).join("libdeps"))
}

fn to_paths(items: Vec<String>) -> Vec<PathBuf> {
    items.into_iter().map(PathBuf::from).collect()
}
