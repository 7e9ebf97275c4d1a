//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `pioneer-adapters` crate provides implementations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::{
    BoardConfig, ConfigTuple, ConfigValue, FrameworkDecl, InstalledPackage, LoadMode,
    PackageManifest, value_objects::ROOT_SECTION,
};
use crate::error::PioneerResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `pioneer_adapters::filesystem::LocalFilesystem` (production)
/// - `pioneer_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PioneerResult<()>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> PioneerResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> PioneerResult<()>;

    /// Copy the tree at `from` to `to`, which must not exist yet.
    /// Symbolic links are copied as links, not followed.
    fn copy_tree(&self, from: &Path, to: &Path) -> PioneerResult<()>;

    /// Every directory below `root`, `root` included, in sorted walk order.
    /// Subdirectories that cannot be read are left out; only an unreadable
    /// `root` is an error.
    fn walk_dirs(&self, root: &Path) -> PioneerResult<Vec<PathBuf>>;

    /// Last modification time in unix seconds.
    fn modified(&self, path: &Path) -> PioneerResult<i64>;

    /// Home directory used to expand a leading `~`.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Port for opening project configuration files.
#[cfg_attr(test, automock)]
pub trait ConfigLoader: Send + Sync {
    /// Open and parse an existing configuration file.
    ///
    /// A missing or unparsable file is a configuration error.
    fn open(&self, path: &Path, mode: LoadMode) -> PioneerResult<Box<dyn ProjectConfig>>;

    /// An empty configuration bound to `path`; nothing is written until
    /// [`ProjectConfig::save`].
    fn create(&self, path: &Path) -> PioneerResult<Box<dyn ProjectConfig>>;
}

/// An opened project configuration.
///
/// The explicit capability set this layer relies on. Relative paths stored
/// in option values are relative to [`ProjectConfig::project_dir`].
#[cfg_attr(test, automock)]
pub trait ProjectConfig: Send {
    /// Path of the configuration file.
    fn path(&self) -> &Path;

    /// Root directory of the project this configuration belongs to.
    fn project_dir(&self) -> PathBuf {
        self.path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    fn sections(&self) -> Vec<String>;

    /// Environment names, in file order.
    fn envs(&self) -> Vec<String>;

    fn has_section(&self, section: &str) -> bool;

    fn has_option(&self, section: &str, option: &str) -> bool;

    fn options(&self, section: &str) -> Vec<String>;

    /// Value of `option`, after interpolation and inheritance when the file
    /// was opened in [`LoadMode::Full`].
    fn get(&self, section: &str, option: &str) -> PioneerResult<Option<ConfigValue>>;

    fn items(&self, section: &str) -> PioneerResult<Vec<(String, ConfigValue)>>;

    fn set(&mut self, section: &str, option: &str, value: ConfigValue) -> PioneerResult<()>;

    fn add_section(&mut self, section: &str) -> PioneerResult<()>;

    /// Returns whether the option existed.
    fn remove_option(&mut self, section: &str, option: &str) -> bool;

    /// Returns whether the section existed.
    fn remove_section(&mut self, section: &str) -> bool;

    /// Merge `data` into the configuration; `clear` drops everything first.
    fn update(&mut self, data: ConfigTuple, clear: bool);

    fn as_tuple(&self) -> ConfigTuple;

    /// Check structural rules. `silent` suppresses warnings, not errors.
    fn validate(&self, silent: bool) -> PioneerResult<()>;

    /// Persist to [`ProjectConfig::path`].
    fn save(&self) -> PioneerResult<()>;

    /// Single-string value of `option`.
    fn get_string(&self, section: &str, option: &str) -> PioneerResult<Option<String>> {
        Ok(self.get(section, option)?.map(|v| v.joined()))
    }

    /// List value of `option`; empty when absent.
    fn get_list(&self, section: &str, option: &str) -> PioneerResult<Vec<String>> {
        Ok(self
            .get(section, option)?
            .map(|v| v.items())
            .unwrap_or_default())
    }

    fn default_envs(&self) -> PioneerResult<Vec<String>> {
        self.get_list(ROOT_SECTION, "default_envs")
    }
}

/// Port onto the package manager's installed-package index.
///
/// Implementations must tolerate concurrent readers.
#[cfg_attr(test, automock)]
pub trait PackageManager: Send + Sync {
    /// Every installed platform package.
    fn installed(&self) -> PioneerResult<Vec<InstalledPackage>>;

    /// The installed package rooted at `dir`, if any.
    fn package_at(&self, dir: &Path) -> Option<InstalledPackage>;

    fn load_manifest(&self, package: &InstalledPackage) -> PioneerResult<PackageManifest>;

    /// Board definition from any installed platform.
    fn board_config(&self, board_id: &str) -> PioneerResult<BoardConfig>;
}

/// Port creating the platform an environment builds with.
#[cfg_attr(test, automock)]
pub trait PlatformFactory: Send + Sync {
    /// Resolve the platform of `env` in the project at `project_dir`.
    ///
    /// With `autoinstall` the factory may install a missing platform first.
    fn from_env(
        &self,
        project_dir: &Path,
        env: &str,
        autoinstall: bool,
    ) -> PioneerResult<Box<dyn Platform>>;
}

/// A resolved, installed development platform.
#[cfg_attr(test, automock)]
pub trait Platform: Send + Sync {
    fn name(&self) -> String;

    fn title(&self) -> String;

    /// Installation directory of the platform package.
    fn dir(&self) -> PathBuf;

    /// Frameworks the platform declares, keyed by framework name.
    fn frameworks(&self) -> BTreeMap<String, FrameworkDecl>;

    /// An installed package this platform depends on, by package name.
    fn get_package(&self, name: &str) -> Option<InstalledPackage>;

    fn load_manifest(&self, package: &InstalledPackage) -> PioneerResult<PackageManifest>;

    fn board_config(&self, board_id: &str) -> PioneerResult<BoardConfig>;
}

/// ANSI colour policy for the external build tool's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Leave the tool's own detection alone.
    #[default]
    Auto,
    /// Plain text, no escape codes.
    Off,
    Force,
}

/// How to run the external build tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnOptions {
    pub working_dir: PathBuf,
    /// Variables set on the child in addition to the inherited environment.
    pub env: BTreeMap<String, String>,
    pub color: ColorMode,
    /// Require an out-of-process run even if the runner could execute the
    /// command in-process.
    pub force_subprocess: bool,
}

impl SpawnOptions {
    /// Out-of-process run in `working_dir`.
    pub fn subprocess(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            force_subprocess: true,
            ..Self::default()
        }
    }

    /// Dispatched run in `working_dir` with `env` and plain-text output.
    pub fn dispatched(working_dir: impl Into<PathBuf>, env: BTreeMap<String, String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            env,
            color: ColorMode::Off,
            force_subprocess: false,
        }
    }
}

/// What the external tool printed and how it exited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Port for the external build tool (the `core.exec` command).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CoreRunner: Send + Sync {
    /// Run the tool with `args`. A non-zero exit is an error.
    async fn exec(&self, args: Vec<String>, options: SpawnOptions) -> PioneerResult<ExecOutput>;
}

/// Port fetching remote text (the `os.request_content` command).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn request_content(&self, url: &str) -> PioneerResult<String>;
}

/// A progress message for the caller's front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The front end's notification channel, when it named one.
    pub method: Option<String>,
    pub message: String,
}

/// Port pushing progress messages to the caller's front end.
#[cfg_attr(test, automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}
