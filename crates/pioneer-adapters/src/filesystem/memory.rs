//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use pioneer_core::{
    application::{ApplicationError, ports::Filesystem},
    error::PioneerResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    home: Option<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Use `home` to expand `~`.
    pub fn with_home(self, home: impl Into<PathBuf>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.home = Some(home.into());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn write_lock(
        &self,
    ) -> PioneerResult<std::sync::RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::AdapterLockError.into())
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFilesystemInner {
    fn add_dir_chain(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> PioneerResult<()> {
        self.write_lock()?.add_dir_chain(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> PioneerResult<()> {
        let mut inner = self.write_lock()?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> PioneerResult<()> {
        let mut inner = self.write_lock()?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> PioneerResult<()> {
        let mut inner = self.write_lock()?;
        if inner.directories.contains(to) || inner.files.contains_key(to) {
            return Err(ApplicationError::FilesystemError {
                path: to.to_path_buf(),
                reason: "Destination already exists".into(),
            }
            .into());
        }

        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter_map(|p| p.strip_prefix(from).ok().map(|rel| to.join(rel)))
            .collect();
        let files: Vec<(PathBuf, String)> = inner
            .files
            .iter()
            .filter_map(|(p, c)| p.strip_prefix(from).ok().map(|rel| (to.join(rel), c.clone())))
            .collect();

        inner.add_dir_chain(to);
        for dir in dirs {
            inner.directories.insert(dir);
        }
        inner.files.extend(files);
        Ok(())
    }

    fn walk_dirs(&self, root: &Path) -> PioneerResult<Vec<PathBuf>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::AdapterLockError)?;
        Ok(inner
            .directories
            .iter()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }

    fn modified(&self, path: &Path) -> PioneerResult<i64> {
        if self.exists(path) {
            Ok(0)
        } else {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file or directory".into(),
            }
            .into())
        }
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.inner.read().ok().and_then(|inner| inner.home.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_tree_duplicates_subtree() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/a/sub")).unwrap();
        fs.write_file(Path::new("/a/sub/x.txt"), "x").unwrap();

        fs.copy_tree(Path::new("/a"), Path::new("/b")).unwrap();
        assert_eq!(fs.read_file(Path::new("/b/sub/x.txt")).as_deref(), Some("x"));
        assert!(fs.is_dir(Path::new("/b/sub")));
        assert!(fs.is_file(Path::new("/a/sub/x.txt")));
    }

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/nowhere/x"), "").is_err());
    }

    #[test]
    fn remove_dir_all_drops_descendants() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/p/src")).unwrap();
        fs.write_file(Path::new("/p/src/main.cpp"), "").unwrap();
        fs.remove_dir_all(Path::new("/p/src")).unwrap();
        assert!(!fs.exists(Path::new("/p/src/main.cpp")));
        assert!(fs.is_dir(Path::new("/p")));
    }

    #[test]
    fn home_dir_is_unset_until_configured() {
        assert_eq!(MemoryFilesystem::new().home_dir(), None);
        let fs = MemoryFilesystem::new().with_home("/home/dev");
        assert_eq!(fs.home_dir(), Some(PathBuf::from("/home/dev")));
    }
}
