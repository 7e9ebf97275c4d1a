use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::common::{base_name, path_to_name};

/// Summary of a recently opened project, as shown on a project list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub path: PathBuf,
    /// Last two path segments of `path`.
    pub name: String,
    /// Last modification of the project directory, unix seconds.
    pub modified: i64,
    pub boards: Vec<BoardRef>,
    pub description: Option<String>,
    pub envs: Vec<String>,
    pub env_lib_storages: Vec<LibStorage>,
    pub extra_lib_storages: Vec<LibStorage>,
}

/// A board referenced by an environment, with its resolved display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRef {
    pub id: String,
    pub name: String,
}

impl BoardRef {
    /// Board whose display name could not be resolved.
    pub fn unresolved(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
        }
    }
}

/// A library directory attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibStorage {
    pub name: String,
    pub path: PathBuf,
}

impl LibStorage {
    /// Per-environment dependency storage; named after the environment.
    pub fn for_env(path: &Path) -> Self {
        Self {
            name: base_name(path),
            path: path.to_path_buf(),
        }
    }

    /// User-declared extra library directory; named by its last two segments.
    pub fn extra(path: &Path) -> Self {
        Self {
            name: path_to_name(path),
            path: path.to_path_buf(),
        }
    }
}

/// Raw facts read from one project's configuration, before board names are
/// resolved and library directories are checked on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFacts {
    pub envs: Vec<String>,
    pub description: Option<String>,
    pub board_ids: Vec<String>,
    pub env_libdeps_dirs: Vec<PathBuf>,
    pub lib_extra_dirs: Vec<PathBuf>,
}
