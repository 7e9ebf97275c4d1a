//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `PIONEER_*` environment variables (`PIONEER_OUTPUT__NO_COLOR` for
//!    nested keys, comma-separated `PIONEER_RECENT_PROJECTS`)
//! 3. Config file (`--config` / `PIONEER_CONFIG`, or the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "PIONEER";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the package manager's installation (`platforms/`, `packages/`).
    pub core_dir: PathBuf,
    /// Where imported projects are created.
    pub projects_dir: PathBuf,
    /// The build tool executable.
    pub pio_executable: PathBuf,
    /// Identifier announced to the build tool, e.g. `vscode`.
    pub caller_id: Option<String>,
    /// Project roots listed by `pioneer projects`.
    pub recent_projects: Vec<PathBuf>,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let home = directories::BaseDirs::new()
            .map(|d| d.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let documents = directories::UserDirs::new()
            .and_then(|d| d.document_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| home.join("Documents"));
        let core_dir = std::env::var_os("PLATFORMIO_CORE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".platformio"));

        Self {
            core_dir,
            projects_dir: documents.join("PlatformIO").join("Projects"),
            pio_executable: PathBuf::from("pio"),
            caller_id: None,
            recent_projects: Vec::new(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist. Without it the default location is read when present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };

        Config::builder()
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("recent_projects"),
            )
            .build()
            .and_then(Config::try_deserialize)
            .with_context(|| format!("reading configuration from {}", path.display()))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.pioneer.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("io", "pioneer", "pioneer")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".pioneer.toml"))
    }

    /// Value of a dotted settings key, rendered for display.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "core_dir" => self.core_dir.display().to_string(),
            "projects_dir" => self.projects_dir.display().to_string(),
            "pio_executable" => self.pio_executable.display().to_string(),
            "caller_id" => self.caller_id.clone().unwrap_or_default(),
            "recent_projects" => self
                .recent_projects
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(","),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => return None,
        };
        Some(value)
    }
}
