//! Config Service - read/write façade over `platformio.ini`.
//!
//! Every call first resolves a caller-supplied "file or directory" path into
//! a [`ConfigHandle`]; the handle's project root is then passed explicitly to
//! everything that needs one. The process working directory is never changed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ConfigLoader, Filesystem, ProjectConfig},
    },
    domain::{
        ConfigQuery, ConfigTuple, ConfigValue, LoadMode,
        value_objects::{CONFIG_FILE_NAME, ROOT_SECTION},
    },
    error::{PioneerError, PioneerResult},
};

/// A resolved configuration location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigHandle {
    /// Root against which relative option values are resolved.
    pub project_dir: PathBuf,
    pub config_path: PathBuf,
}

/// Thin façade over per-project configuration objects.
pub struct ConfigService {
    loader: Arc<dyn ConfigLoader>,
    filesystem: Arc<dyn Filesystem>,
    fallback_dir: PathBuf,
}

impl ConfigService {
    /// `fallback_dir` is the project root used when a path names neither an
    /// existing file nor an existing directory.
    pub fn new(
        loader: Arc<dyn ConfigLoader>,
        filesystem: Arc<dyn Filesystem>,
        fallback_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            loader,
            filesystem,
            fallback_dir: fallback_dir.into(),
        }
    }

    /// Resolve `path_or_dir` into a configuration handle.
    ///
    /// - directory: config is `<dir>/platformio.ini`, root is the directory
    /// - file: root is its parent
    /// - neither: root is the fallback directory, config path kept as given
    pub fn resolve(&self, path_or_dir: &Path) -> ConfigHandle {
        let candidate = if path_or_dir.is_absolute() {
            path_or_dir.to_path_buf()
        } else {
            self.fallback_dir.join(path_or_dir)
        };

        if self.filesystem.is_dir(&candidate) {
            ConfigHandle {
                config_path: candidate.join(CONFIG_FILE_NAME),
                project_dir: candidate,
            }
        } else if self.filesystem.is_file(&candidate) {
            ConfigHandle {
                project_dir: candidate
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.fallback_dir.clone()),
                config_path: candidate,
            }
        } else {
            debug!(path = %candidate.display(), "Path does not exist, using fallback root");
            ConfigHandle {
                project_dir: self.fallback_dir.clone(),
                config_path: candidate,
            }
        }
    }

    /// Run one read-only query against the configuration behind `handle`.
    #[instrument(skip_all, fields(config = %handle.config_path.display(), method = query.method()))]
    pub fn invoke(&self, handle: &ConfigHandle, query: &ConfigQuery) -> PioneerResult<Value> {
        let config = self.loader.open(&handle.config_path, LoadMode::Full)?;
        Self::answer(config.as_ref(), query)
    }

    /// RPC-style entry: parse `method(args...)` and run it.
    pub fn call(&self, path_or_dir: &Path, method: &str, args: &[Value]) -> PioneerResult<Value> {
        let query = ConfigQuery::from_call(method, args)?;
        let handle = self.resolve(path_or_dir);
        self.invoke(&handle, &query)
    }

    /// Raw structural contents of a configuration: no interpolation, no
    /// extra configs.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> PioneerResult<ConfigTuple> {
        let handle = self.resolve(path);
        let config = self.loader.open(&handle.config_path, LoadMode::Raw)?;
        Ok(config.as_tuple())
    }

    /// Replace the whole configuration with `data` and save it.
    ///
    /// The file is created when absent.
    #[instrument(skip(self, data), fields(path = %path.display(), sections = data.len()))]
    pub fn dump(&self, path: &Path, data: ConfigTuple) -> PioneerResult<()> {
        let handle = self.resolve(path);
        let mut config = self.open_or_create(&handle.config_path)?;
        config.update(data, true);
        config.save()?;
        info!("Configuration written");
        Ok(())
    }

    /// Set or clear `platformio.description`.
    ///
    /// Clearing removes the option, and the `[platformio]` section too when
    /// nothing else is left in it.
    #[instrument(skip(self, text), fields(path = %path.display()))]
    pub fn set_description(&self, path: &Path, text: &str) -> PioneerResult<()> {
        let handle = self.resolve(path);
        let mut config = self.open_or_create(&handle.config_path)?;

        if !config.has_section(ROOT_SECTION) {
            config.add_section(ROOT_SECTION)?;
        }
        if text.is_empty() {
            config.remove_option(ROOT_SECTION, "description");
            if config.options(ROOT_SECTION).is_empty() {
                config.remove_section(ROOT_SECTION);
            }
        } else {
            config.set(ROOT_SECTION, "description", ConfigValue::from(text))?;
        }
        config.save()
    }

    fn open_or_create(&self, config_path: &Path) -> PioneerResult<Box<dyn ProjectConfig>> {
        if self.filesystem.is_file(config_path) {
            self.loader.open(config_path, LoadMode::Raw)
        } else {
            self.loader.create(config_path)
        }
    }

    fn answer(config: &dyn ProjectConfig, query: &ConfigQuery) -> PioneerResult<Value> {
        let value = match query {
            ConfigQuery::Sections => Value::from(config.sections()),
            ConfigQuery::Envs => Value::from(config.envs()),
            ConfigQuery::DefaultEnvs => Value::from(config.default_envs()?),
            ConfigQuery::HasSection { section } => Value::Bool(config.has_section(section)),
            ConfigQuery::HasOption { section, option } => {
                Value::Bool(config.has_option(section, option))
            }
            ConfigQuery::Options { section } => Value::from(config.options(section)),
            ConfigQuery::Get {
                section,
                option,
                default,
            } => match (config.get(section, option)?, default) {
                (Some(value), _) => value.to_json(),
                (None, Some(default)) => default.clone(),
                (None, None) => {
                    return Err(PioneerError::configuration(
                        config.path(),
                        format!("option '{option}' not found in section '{section}'"),
                    ));
                }
            },
            ConfigQuery::GetList { section, option } => {
                Value::from(config.get_list(section, option)?)
            }
            ConfigQuery::Items { section } => {
                if !config.has_section(section) {
                    return Err(ApplicationError::Configuration {
                        path: config.path().to_path_buf(),
                        reason: format!("section '{section}' not found"),
                    }
                    .into());
                }
                Value::Array(
                    config
                        .items(section)?
                        .into_iter()
                        .map(|(option, value)| Value::Array(vec![option.into(), value.to_json()]))
                        .collect(),
                )
            }
            ConfigQuery::AsTuple => serde_json::to_value(config.as_tuple()).map_err(|e| {
                PioneerError::Internal {
                    message: format!("serializing configuration: {e}"),
                }
            })?,
            ConfigQuery::Validate { silent } => {
                config.validate(*silent)?;
                Value::Bool(true)
            }
        };
        Ok(value)
    }
}
