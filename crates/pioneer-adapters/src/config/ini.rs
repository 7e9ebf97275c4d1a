//! `platformio.ini` backed implementation of the configuration ports.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use pioneer_core::{
    application::ports::{ConfigLoader, ProjectConfig},
    domain::{
        ConfigSection, ConfigTuple, ConfigValue, DomainValidator, LoadMode,
        value_objects::{COMMON_ENV_SECTION, ROOT_SECTION, env_name},
    },
    error::{PioneerError, PioneerResult},
};
use tracing::{debug, instrument, warn};

use super::parser::{self, IniError};

const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Options that were renamed; reading the old name still works but
/// validation warns about it.
const RENAMED_OPTIONS: &[(&str, &str)] = &[
    ("env_default", "default_envs"),
    ("src_filter", "build_src_filter"),
    ("src_build_flags", "build_src_flags"),
];

/// Built-in `[platformio]` directory options, relative to the project root.
/// References to an option the file leaves unset resolve to these.
const PLATFORMIO_DEFAULTS: &[(&str, &str)] = &[
    ("workspace_dir", ".pio"),
    ("build_dir", "${platformio.workspace_dir}/build"),
    ("libdeps_dir", "${platformio.workspace_dir}/libdeps"),
    ("include_dir", "include"),
    ("src_dir", "src"),
    ("lib_dir", "lib"),
    ("data_dir", "data"),
    ("test_dir", "test"),
    ("boards_dir", "boards"),
    ("monitor_dir", "monitor"),
    ("shared_dir", "shared"),
];

fn builtin_default(option: &str) -> Option<&'static str> {
    PLATFORMIO_DEFAULTS
        .iter()
        .find(|(name, _)| *name == option)
        .map(|(_, value)| *value)
}

/// Opens `platformio.ini` files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniConfigLoader;

impl IniConfigLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigLoader for IniConfigLoader {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn open(&self, path: &Path, mode: LoadMode) -> PioneerResult<Box<dyn ProjectConfig>> {
        Ok(Box::new(IniConfig::open(path, mode)?))
    }

    fn create(&self, path: &Path) -> PioneerResult<Box<dyn ProjectConfig>> {
        Ok(Box::new(IniConfig::empty(path)))
    }
}

/// One parsed configuration file, plus its extra configs in full mode.
#[derive(Debug, Clone)]
pub struct IniConfig {
    path: PathBuf,
    mode: LoadMode,
    sections: Vec<ConfigSection>,
    /// Sections from `extra_configs`; they override the main file.
    extra: Vec<ConfigSection>,
}

impl IniConfig {
    /// Read and parse `path`, which must exist.
    pub fn open(path: &Path, mode: LoadMode) -> PioneerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PioneerError::configuration(path, format!("cannot read file: {e}")))?;
        let sections = parser::parse(&text).map_err(|e| config_error(path, e))?;

        let mut config = Self {
            path: path.to_path_buf(),
            mode,
            sections,
            extra: Vec::new(),
        };
        if mode == LoadMode::Full {
            config.load_extra_configs()?;
        }
        Ok(config)
    }

    /// Empty configuration bound to `path`.
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            mode: LoadMode::Raw,
            sections: Vec::new(),
            extra: Vec::new(),
        }
    }

    fn load_extra_configs(&mut self) -> PioneerResult<()> {
        let Some(value) = find_option(&self.sections, ROOT_SECTION, "extra_configs") else {
            return Ok(());
        };
        let project_dir = self.project_dir();
        for item in value.items() {
            let extra_path = project_dir.join(&item);
            if !extra_path.is_file() {
                debug!(path = %extra_path.display(), "Extra config not found, ignoring");
                continue;
            }
            let text = std::fs::read_to_string(&extra_path).map_err(|e| {
                PioneerError::configuration(&extra_path, format!("cannot read file: {e}"))
            })?;
            let sections = parser::parse(&text).map_err(|e| config_error(&extra_path, e))?;
            for ConfigSection(name, options) in sections {
                match self.extra.iter_mut().find(|s| s.0 == name) {
                    Some(existing) => {
                        for (option, value) in options {
                            set_in(&mut existing.1, option, value);
                        }
                    }
                    None => self.extra.push(ConfigSection(name, options)),
                }
            }
        }
        Ok(())
    }

    fn full(&self) -> bool {
        self.mode == LoadMode::Full
    }

    /// The option exactly as written in one section, extra configs first.
    fn literal(&self, section: &str, option: &str) -> Option<&ConfigValue> {
        find_option(&self.extra, section, option).or_else(|| find_option(&self.sections, section, option))
    }

    fn section_exists(&self, section: &str) -> bool {
        self.sections.iter().chain(&self.extra).any(|s| s.0 == section)
    }

    /// Sections an env section inherits from, nearest first.
    fn parents(&self, section: &str) -> Vec<String> {
        if !self.full() || env_name(section).is_none() {
            return Vec::new();
        }
        let mut parents: Vec<String> = self
            .literal(section, "extends")
            .map(ConfigValue::items)
            .unwrap_or_default();
        if self.section_exists(COMMON_ENV_SECTION) {
            parents.push(COMMON_ENV_SECTION.to_string());
        }
        parents
    }

    /// Unexpanded value, following `extends` and `[env]` inheritance in
    /// full mode.
    fn lookup(
        &self,
        section: &str,
        option: &str,
        chain: &mut HashSet<String>,
    ) -> Result<Option<ConfigValue>, IniError> {
        if chain.contains(section) {
            return Err(IniError::ExtendsCycle(section.to_string()));
        }
        if let Some(value) = self.literal(section, option) {
            return Ok(Some(value.clone()));
        }
        // only ancestors count; `[env]` is reachable through several parents
        chain.insert(section.to_string());
        for parent in self.parents(section) {
            if let Some(value) = self.lookup(&parent, option, chain)? {
                return Ok(Some(value));
            }
        }
        chain.remove(section);
        Ok(None)
    }

    fn resolve(
        &self,
        section: &str,
        option: &str,
        depth: usize,
    ) -> Result<Option<ConfigValue>, IniError> {
        let Some(raw) = self.lookup(section, option, &mut HashSet::new())? else {
            return Ok(None);
        };
        if !self.full() {
            return Ok(Some(raw));
        }
        let value = match raw {
            ConfigValue::Single(s) => ConfigValue::Single(self.interpolate(section, &s, depth)?),
            ConfigValue::Multi(items) => ConfigValue::Multi(
                items
                    .iter()
                    .map(|item| self.interpolate(section, item, depth))
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(Some(value))
    }

    /// Expand `${section.option}`, `${sysenv.VAR}` and `${this.option}`.
    fn interpolate(&self, section: &str, text: &str, depth: usize) -> Result<String, IniError> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(IniError::InterpolationTooDeep(text.to_string()));
        }
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .ok_or_else(|| IniError::UnterminatedInterpolation(text.to_string()))?;
            out.push_str(&self.reference(section, &after[..end], depth)?);
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn reference(&self, section: &str, reference: &str, depth: usize) -> Result<String, IniError> {
        let bad = || IniError::BadReference(reference.to_string());
        let (target, option) = reference.split_once('.').ok_or_else(bad)?;
        match target {
            "sysenv" => Ok(std::env::var(option).unwrap_or_default()),
            "this" if option == "__env__" => Ok(env_name(section).unwrap_or_default().to_string()),
            "this" => self
                .resolve(section, option, depth + 1)?
                .map(|v| v.joined())
                .ok_or_else(bad),
            _ => match self.resolve(target, option, depth + 1)? {
                Some(value) => Ok(value.joined()),
                None if target == ROOT_SECTION => {
                    let default = builtin_default(option).ok_or_else(bad)?;
                    self.interpolate(ROOT_SECTION, default, depth + 1)
                }
                None => Err(bad()),
            },
        }
    }

    fn section_mut(&mut self, section: &str) -> Option<&mut ConfigSection> {
        self.sections.iter_mut().find(|s| s.0 == section)
    }

    fn err(&self, e: IniError) -> PioneerError {
        config_error(&self.path, e)
    }
}

impl ProjectConfig for IniConfig {
    fn path(&self) -> &Path {
        &self.path
    }

    fn sections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sections.iter().map(|s| s.0.clone()).collect();
        for ConfigSection(name, _) in &self.extra {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    fn envs(&self) -> Vec<String> {
        self.sections()
            .iter()
            .filter_map(|s| env_name(s).map(str::to_string))
            .collect()
    }

    fn has_section(&self, section: &str) -> bool {
        self.section_exists(section)
    }

    fn has_option(&self, section: &str, option: &str) -> bool {
        matches!(
            self.lookup(section, option, &mut HashSet::new()),
            Ok(Some(_))
        )
    }

    fn options(&self, section: &str) -> Vec<String> {
        let mut names = Vec::new();
        let mut queue = vec![section.to_string()];
        let mut visited = HashSet::new();
        while let Some(current) = queue.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for ConfigSection(name, options) in self.sections.iter().chain(&self.extra) {
                if *name != current {
                    continue;
                }
                for (option, _) in options {
                    if !names.contains(option) {
                        names.push(option.clone());
                    }
                }
            }
            // nearest parent must be visited first
            queue.extend(self.parents(&current).into_iter().rev());
        }
        names
    }

    fn get(&self, section: &str, option: &str) -> PioneerResult<Option<ConfigValue>> {
        self.resolve(section, option, 0).map_err(|e| self.err(e))
    }

    fn items(&self, section: &str) -> PioneerResult<Vec<(String, ConfigValue)>> {
        let mut items = Vec::new();
        for option in self.options(section) {
            if let Some(value) = self.get(section, &option)? {
                items.push((option, value));
            }
        }
        Ok(items)
    }

    fn set(&mut self, section: &str, option: &str, value: ConfigValue) -> PioneerResult<()> {
        let path = self.path.clone();
        let Some(target) = self.section_mut(section) else {
            return Err(PioneerError::configuration(
                path,
                format!("no section [{section}]"),
            ));
        };
        set_in(&mut target.1, option.to_lowercase(), value);
        Ok(())
    }

    fn add_section(&mut self, section: &str) -> PioneerResult<()> {
        if self.sections.iter().any(|s| s.0 == section) {
            return Err(PioneerError::configuration(
                &self.path,
                format!("section [{section}] already exists"),
            ));
        }
        self.sections
            .push(ConfigSection(section.to_string(), Vec::new()));
        Ok(())
    }

    fn remove_option(&mut self, section: &str, option: &str) -> bool {
        let Some(target) = self.section_mut(section) else {
            return false;
        };
        let before = target.1.len();
        target.1.retain(|(name, _)| name != option);
        target.1.len() != before
    }

    fn remove_section(&mut self, section: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.0 != section);
        self.sections.len() != before
    }

    fn update(&mut self, data: ConfigTuple, clear: bool) {
        if clear {
            self.sections.clear();
        }
        for ConfigSection(name, options) in data {
            match self.section_mut(&name) {
                Some(existing) => {
                    for (option, value) in options {
                        set_in(&mut existing.1, option, value);
                    }
                }
                None => self.sections.push(ConfigSection(name, options)),
            }
        }
    }

    fn as_tuple(&self) -> ConfigTuple {
        if !self.full() {
            return self.sections.clone();
        }
        self.sections()
            .into_iter()
            .map(|name| {
                let items = self.items(&name).unwrap_or_else(|e| {
                    warn!(section = %name, error = %e, "Section could not be expanded");
                    Vec::new()
                });
                ConfigSection(name, items)
            })
            .collect()
    }

    fn validate(&self, silent: bool) -> PioneerResult<()> {
        let envs = self.envs();
        if envs.is_empty() {
            return Err(PioneerError::configuration(
                &self.path,
                "no [env:NAME] section defined",
            ));
        }
        for env in &envs {
            DomainValidator::validate_env_name(env)
                .map_err(|e| PioneerError::configuration(&self.path, e.to_string()))?;
        }
        for default_env in self.default_envs()? {
            if !envs.contains(&default_env) {
                return Err(PioneerError::configuration(
                    &self.path,
                    format!("default environment '{default_env}' is not defined"),
                ));
            }
        }

        if !silent {
            for section in self.sections() {
                for (old, new) in RENAMED_OPTIONS {
                    if find_option(&self.sections, &section, old).is_some() {
                        warn!(section = %section, "'{old}' is deprecated, use '{new}' instead");
                    }
                }
            }
        }
        Ok(())
    }

    fn save(&self) -> PioneerResult<()> {
        std::fs::write(&self.path, parser::render(&self.sections))
            .map_err(|e| PioneerError::configuration(&self.path, format!("cannot write file: {e}")))?;
        debug!(path = %self.path.display(), "Configuration saved");
        Ok(())
    }

    fn default_envs(&self) -> PioneerResult<Vec<String>> {
        let mut envs = self.get_list(ROOT_SECTION, "default_envs")?;
        if envs.is_empty() {
            envs = self.get_list(ROOT_SECTION, "env_default")?;
        }
        Ok(envs)
    }
}

fn find_option<'a>(
    sections: &'a [ConfigSection],
    section: &str,
    option: &str,
) -> Option<&'a ConfigValue> {
    sections
        .iter()
        .find(|s| s.0 == section)
        .and_then(|s| s.1.iter().find(|(name, _)| name == option))
        .map(|(_, value)| value)
}

fn set_in(options: &mut Vec<(String, ConfigValue)>, option: String, value: ConfigValue) {
    match options.iter_mut().find(|(name, _)| *name == option) {
        Some(slot) => slot.1 = value,
        None => options.push((option, value)),
    }
}

fn config_error(path: &Path, e: IniError) -> PioneerError {
    PioneerError::configuration(path, e.to_string())
}
