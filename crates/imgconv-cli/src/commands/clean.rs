//! `clean`: remove generated output directories.

use std::fs;

use anyhow::Context;
use tracing::info;

use crate::context::{AppContext, CliError, CliResult};

/// Remove every generated directory that exists; returns how many were removed.
pub(crate) fn handle_clean(ctx: &AppContext<'_>) -> CliResult<usize> {
    ctx.progress("start cleaning");
    let mut removed = 0;
    for dir in ctx.config.layout.generated_dirs() {
        if !dir.exists() {
            continue;
        }
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to remove {}", dir.display()))
            .map_err(CliError::failure)?;
        if ctx.config.flags.verbose {
            info!(path = %dir.display(), "deleted");
        }
        removed += 1;
    }
    ctx.progress("done cleaning");
    Ok(removed)
}
