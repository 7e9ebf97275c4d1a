use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A ready-to-open example project bundled inside an installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleItem {
    /// Path below the package's `examples` directory, `/`-joined.
    pub name: String,
    pub path: PathBuf,
    pub description: Option<String>,
}

impl ExampleItem {
    /// Build an item for `dir`, naming it relative to `examples_root`.
    ///
    /// Returns `None` when `dir` is not below `examples_root`.
    pub fn new(examples_root: &Path, dir: &Path, description: Option<String>) -> Option<Self> {
        let relative = dir.strip_prefix(examples_root).ok()?;
        let name = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        Some(Self {
            name,
            path: dir.to_path_buf(),
            description,
        })
    }
}

/// Title and version of the package that ships a set of examples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageBrief {
    pub title: String,
    pub version: String,
}

/// All examples of one installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleGroup {
    pub platform: PackageBrief,
    pub items: Vec<ExampleItem>,
}

impl ExampleGroup {
    /// Group with its items ordered by name.
    pub fn new(platform: PackageBrief, mut items: Vec<ExampleItem>) -> Self {
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Self { platform, items }
    }
}
