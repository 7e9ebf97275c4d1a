//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use pioneer_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{PioneerError, PioneerResult},
};
use tracing::debug;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> PioneerResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> PioneerResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove_dir_all(&self, path: &Path) -> PioneerResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> PioneerResult<()> {
        if to.exists() {
            return Err(ApplicationError::FilesystemError {
                path: to.to_path_buf(),
                reason: "Destination already exists".into(),
            }
            .into());
        }

        for entry in WalkDir::new(from).follow_links(false) {
            let entry = entry.map_err(|e| walk_error(from, e))?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| PioneerError::Internal {
                    message: format!("walk left {}: {e}", from.display()),
                })?;
            let target = to.join(relative);
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                copy_symlink(entry.path(), &target)?;
            } else if file_type.is_dir() {
                self.create_dir_all(&target)?;
            } else {
                std::fs::copy(entry.path(), &target)
                    .map_err(|e| map_io_error(&target, e, "copy file"))?;
            }
        }
        debug!(from = %from.display(), to = %to.display(), "Tree copied");
        Ok(())
    }

    fn walk_dirs(&self, root: &Path) -> PioneerResult<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            // Only an unreadable root fails the walk; bad subtrees are skipped.
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(walk_error(root, e)),
                Err(e) => {
                    debug!(root = %root.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                dirs.push(entry.into_path());
            }
        }
        Ok(dirs)
    }

    fn modified(&self, path: &Path) -> PioneerResult<i64> {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| map_io_error(path, e, "read modification time"))?;
        let secs = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Ok(secs)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> PioneerResult<()> {
    let pointee = std::fs::read_link(link).map_err(|e| map_io_error(link, e, "read link"))?;
    std::os::unix::fs::symlink(&pointee, target)
        .map_err(|e| map_io_error(target, e, "create symlink"))
}

#[cfg(windows)]
fn copy_symlink(link: &Path, target: &Path) -> PioneerResult<()> {
    let pointee = std::fs::read_link(link).map_err(|e| map_io_error(link, e, "read link"))?;
    let result = if link.is_dir() {
        std::os::windows::fs::symlink_dir(&pointee, target)
    } else {
        std::os::windows::fs::symlink_file(&pointee, target)
    };
    result.map_err(|e| map_io_error(target, e, "create symlink"))
}

fn walk_error(root: &Path, e: walkdir::Error) -> PioneerError {
    let path = e.path().unwrap_or(root).to_path_buf();
    ApplicationError::FilesystemError {
        path,
        reason: format!("Failed to walk directory: {e}"),
    }
    .into()
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> PioneerError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
