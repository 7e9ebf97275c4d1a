//! Domain value objects: project layout constants, version pinning, source kinds.
//!
//! These are pure value types. They hold no I/O; anything that needs the
//! filesystem or an installed package lives behind a port.

use serde::{Deserialize, Serialize};
use std::fmt;

// ── Project layout ───────────────────────────────────────────────────────────

/// Name of the canonical configuration file inside a project directory.
pub const CONFIG_FILE_NAME: &str = "platformio.ini";

/// Top-level configuration section holding project-wide options.
pub const ROOT_SECTION: &str = "platformio";

/// Prefix that marks a configuration section as a build environment.
pub const ENV_SECTION_PREFIX: &str = "env:";

/// Section whose options every environment inherits.
pub const COMMON_ENV_SECTION: &str = "env";

/// Workspace directory used when `platformio.workspace_dir` is not set.
pub const DEFAULT_WORKSPACE_DIR: &str = ".pio";

/// Source directory used when `platformio.src_dir` is not set.
pub const DEFAULT_SRC_DIR: &str = "src";

/// Directory inside an installed package that holds bundled examples.
pub const EXAMPLES_DIR_NAME: &str = "examples";

/// Library folder of a stock Arduino IDE installation.
pub const ARDUINO_LIBRARIES_DIR: &str = "~/Documents/Arduino/libraries";

/// Sketch extensions recognised when importing an Arduino project.
pub const SKETCH_EXTENSIONS: [&str; 2] = ["ino", "pde"];

/// Section name for the environment called `name`.
pub fn env_section(name: &str) -> String {
    format!("{ENV_SECTION_PREFIX}{name}")
}

/// Environment name of `section`, if it is an environment section.
pub fn env_name(section: &str) -> Option<&str> {
    section
        .strip_prefix(ENV_SECTION_PREFIX)
        .filter(|name| !name.is_empty())
}

// ── VersionPin ───────────────────────────────────────────────────────────────

/// How a platform version is pinned in a generated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionPin {
    /// `name @ ^version`: accept compatible updates.
    Compatible,
    /// `name @ version`: this exact release only.
    Exact,
}

impl VersionPin {
    /// Choose the pin for `version`.
    ///
    /// Only a version that parses as semver and carries no pre-release part
    /// gets a caret range. Pre-releases and unparsable strings are pinned
    /// exactly, as is any request explicitly flagged `prerelease`.
    pub fn for_version(version: &str, prerelease: bool) -> Self {
        if prerelease {
            return Self::Exact;
        }
        match semver::Version::parse(version.trim()) {
            Ok(v) if v.pre.is_empty() => Self::Compatible,
            _ => Self::Exact,
        }
    }

    /// Render the `platform` option value for `name` at `version`.
    pub fn render(self, name: &str, version: &str) -> String {
        let version = version.trim();
        match self {
            Self::Compatible => format!("{name} @ ^{version}"),
            Self::Exact => format!("{name} @ {version}"),
        }
    }
}

// ── SourceKind ───────────────────────────────────────────────────────────────

/// Layout of a foreign project being imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Arduino,
    #[serde(rename = "platformio")]
    PlatformIO,
}

impl SourceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Arduino => "Arduino",
            Self::PlatformIO => "PlatformIO",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
