//! Generic tree copier.
//!
//! Mirrors a directory tree into another, overwriting existing files. Hidden
//! directories below the root are not descended into.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::error::{FsOpsError, FsOpsResult};

/// One file to be placed in the destination tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyEntry {
    /// Source file.
    pub source: PathBuf,
    /// Destination file (parent directory already exists).
    pub destination: PathBuf,
    /// Path relative to both roots.
    pub relative: PathBuf,
}

/// Copy every file below `source_root` into `dest_root`.
///
/// Returns the number of files copied.
///
/// # Errors
///
/// Returns an error when traversal, directory creation, or a copy fails.
pub fn copy_tree(source_root: &Path, dest_root: &Path) -> FsOpsResult<usize> {
    copy_tree_with(source_root, dest_root, |entry| {
        fs::copy(&entry.source, &entry.destination)
            .map(|_| ())
            .map_err(|source| FsOpsError::io("copy", &entry.source, source))
    })
}

/// Mirror `source_root` under `dest_root` and call `copy` once per file.
///
/// A missing `source_root` copies nothing.
///
/// # Errors
///
/// Returns an error when traversal or directory creation fails, or when
/// `copy` returns an error.
pub fn copy_tree_with<F>(source_root: &Path, dest_root: &Path, mut copy: F) -> FsOpsResult<usize>
where
    F: FnMut(&CopyEntry) -> FsOpsResult<()>,
{
    debug!(
        source = %source_root.display(),
        destination = %dest_root.display(),
        "copy tree"
    );
    if !source_root.exists() {
        info!(source = %source_root.display(), "source directory missing; nothing to copy");
        return Ok(0);
    }

    let mut copied = 0;
    let entries = WalkDir::new(source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden_dir(entry));
    for entry in entries {
        let entry =
            entry.map_err(|source| FsOpsError::walkdir("copy_tree", source_root, source))?;
        let relative = entry
            .path()
            .strip_prefix(source_root)
            .map_err(|_| FsOpsError::outside_root(entry.path(), source_root))?;
        let target = dest_root.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|source| FsOpsError::io("create_dir_all", &target, source))?;
            continue;
        }

        copy(&CopyEntry {
            source: entry.path().to_path_buf(),
            destination: target,
            relative: relative.to_path_buf(),
        })?;
        copied += 1;
    }
    Ok(copied)
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}
