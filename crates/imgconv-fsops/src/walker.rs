//! Tree walker that mirrors a source tree and dispatches matching files.
//!
//! # Design
//! - Destination paths come from `strip_prefix` + `join`, never from string
//!   substitution, so a root name recurring deeper in the path is harmless.
//! - Directories named `old` are pruned together with everything below them.
//! - Entries are visited in file-name order so runs are reproducible.

use std::fs;
use std::path::Path;

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::error::{FsOpsError, FsOpsResult};
use crate::matcher::{PathFilter, matches};
use crate::model::{ConversionJob, ExtensionPair, replace_suffix};

/// Directory name whose contents are never converted.
pub const SKIPPED_DIR_NAME: &str = "old";

/// Walk `source_root`, mirror its directories under `dest_root`, and call
/// `handler` once per matching file.
///
/// A missing `source_root` is not an error; nothing is visited and no output
/// directory is created.
///
/// Returns the number of files handed to `handler`.
///
/// # Errors
///
/// Returns an error when traversal fails, an output directory cannot be
/// created, or `handler` returns an error.
pub fn walk_tree<F>(
    source_root: &Path,
    dest_root: &Path,
    extensions: ExtensionPair,
    filter: Option<&PathFilter>,
    mut handler: F,
) -> FsOpsResult<usize>
where
    F: FnMut(&ConversionJob) -> FsOpsResult<()>,
{
    debug!(
        source = %source_root.display(),
        destination = %dest_root.display(),
        from = extensions.from,
        to = extensions.to,
        "convert tree"
    );
    if !source_root.exists() {
        info!(source = %source_root.display(), "source directory missing; nothing to convert");
        return Ok(0);
    }

    let mut matched = 0;
    let entries = WalkDir::new(source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry));
    for entry in entries {
        let entry = entry.map_err(|source| FsOpsError::walkdir("walk_tree", source_root, source))?;
        let relative = entry
            .path()
            .strip_prefix(source_root)
            .map_err(|_| FsOpsError::outside_root(entry.path(), source_root))?;

        if entry.file_type().is_dir() {
            let target = dest_root.join(relative);
            fs::create_dir_all(&target)
                .map_err(|source| FsOpsError::io("create_dir_all", &target, source))?;
            continue;
        }

        if !matches(source_root, entry.path(), extensions.from, filter) {
            continue;
        }
        let Some(job) = build_job(entry.path(), relative, dest_root, extensions) else {
            continue;
        };
        handler(&job)?;
        matched += 1;
    }

    Ok(matched)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == SKIPPED_DIR_NAME
}

fn build_job(
    source: &Path,
    relative: &Path,
    dest_root: &Path,
    extensions: ExtensionPair,
) -> Option<ConversionJob> {
    let name = relative.file_name()?.to_str()?;
    let renamed = replace_suffix(name, extensions.from, extensions.to)?;
    let destination = dest_root.join(relative).with_file_name(renamed);
    Some(ConversionJob {
        source: source.to_path_buf(),
        destination,
        extensions,
    })
}
