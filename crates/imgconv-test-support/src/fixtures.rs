//! Temporary directory trees for filesystem tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

/// Temporary directory that is removed when dropped.
#[derive(Debug)]
pub struct TempTree {
    dir: TempDir,
}

impl TempTree {
    /// Create a fresh, empty temporary tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("imgconv-").tempdir()?;
        Ok(Self { dir })
    }

    /// Root of the temporary tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Resolve a `/`-separated relative path inside the tree.
    #[must_use]
    pub fn join(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.path().to_path_buf(), |path, segment| path.join(segment))
    }

    /// Write a file (creating parent directories) and return its absolute path.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directories or the file cannot be written.
    pub fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> io::Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Create a directory (and parents) and return its absolute path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn mkdir(&self, relative: &str) -> io::Result<PathBuf> {
        let path = self.join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }
}

/// List every file below `root` as sorted, `/`-separated relative paths.
///
/// A missing root yields an empty list.
///
/// # Errors
///
/// Returns an error if traversal fails for an existing root.
pub fn relative_files(root: &Path) -> io::Result<Vec<String>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(io::Error::other)?
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        files.push(relative);
    }
    files.sort();
    Ok(files)
}
