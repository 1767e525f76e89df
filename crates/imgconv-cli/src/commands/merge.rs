//! Merge step: publish rendered PNGs into the combined output directory.

use std::fs;

use anyhow::Context;
use imgconv_fsops::copy_tree;

use crate::context::{AppContext, CliError, CliResult};

/// Create the combined directory and copy the PNG tree into it.
pub(crate) fn handle_merge(ctx: &AppContext<'_>) -> CliResult<usize> {
    let layout = &ctx.config.layout;
    ctx.progress("start merging images");
    fs::create_dir_all(&layout.all_dir)
        .with_context(|| format!("failed to create {}", layout.all_dir.display()))
        .map_err(CliError::failure)?;
    let copied = copy_tree(&layout.png_dir, &layout.all_dir)?;
    ctx.progress("done merging images");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};

    use imgconv_config::{ProjectLayout, RunConfig, RunFlags, ToolPaths};
    use imgconv_fsops::SystemRunner;
    use imgconv_test_support::{TempTree, relative_files};

    fn config(tree: &TempTree) -> Result<RunConfig> {
        Ok(RunConfig::new(
            ProjectLayout::from_project_dir(tree.path()),
            RunFlags::default(),
            ToolPaths::default(),
        )?)
    }

    #[test]
    fn merge_copies_png_tree_into_all() -> Result<()> {
        let tree = TempTree::new()?;
        tree.write("temp/img_png/a.png", "a")?;
        tree.write("temp/img_png/sub/b.png", "b")?;
        let config = config(&tree)?;

        let copied = handle_merge(&AppContext::new(&config, &SystemRunner))
            .map_err(|err| anyhow!(err.display_message()))?;

        assert_eq!(copied, 2);
        assert_eq!(
            relative_files(&tree.join("temp/img_all"))?,
            vec!["a.png", "sub/b.png"]
        );
        Ok(())
    }

    #[test]
    fn merge_without_png_creates_empty_all_dir() -> Result<()> {
        let tree = TempTree::new()?;
        let config = config(&tree)?;

        let copied = handle_merge(&AppContext::new(&config, &SystemRunner))
            .map_err(|err| anyhow!(err.display_message()))?;

        assert_eq!(copied, 0);
        assert!(tree.join("temp/img_all").is_dir());
        Ok(())
    }
}
