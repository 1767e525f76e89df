//! Project layout discovery and derived directory set.
//!
//! # Design
//! - The project directory is either supplied explicitly or discovered by
//!   walking up from the working directory past the known tool subfolders.
//! - Every source and output directory is derived once here; nothing else in
//!   the workspace builds these paths by hand.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::defaults::LAYOUT_MARKERS;
use crate::error::{ConfigError, ConfigResult};

/// Resolved directory set for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectLayout {
    /// Project root directory.
    pub project_dir: PathBuf,
    /// Display name used to tag log lines (last component of the root).
    pub project_name: String,
    /// Image source tree (`src_doc/img`).
    pub source_dir: PathBuf,
    /// Root of every generated output (`temp`).
    pub dest_dir: PathBuf,
    /// Vector output root (`temp/img_svg`).
    pub svg_dir: PathBuf,
    /// Raster output directory (`temp/img_png`).
    pub png_dir: PathBuf,
    /// Merged output directory (`temp/img_all`).
    pub all_dir: PathBuf,
    /// `UMLet` exports (`temp/img_svg/umlet`).
    pub svg_umlet_dir: PathBuf,
    /// `PlantUML` exports (`temp/img_svg/plantuml`).
    pub svg_plantuml_dir: PathBuf,
    /// Plain SVG copies (`temp/img_svg/svg`).
    pub svg_svg_dir: PathBuf,
    /// Archi exports placed by hand (`temp/img_svg/archi`).
    pub svg_archi_dir: PathBuf,
}

impl ProjectLayout {
    /// Derive the full layout from an explicit project directory.
    #[must_use]
    pub fn from_project_dir(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let project_name = project_dir
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
        let source_dir = project_dir.join("src_doc").join("img");
        let dest_dir = project_dir.join("temp");
        let svg_dir = dest_dir.join("img_svg");
        Self {
            project_name,
            source_dir,
            png_dir: dest_dir.join("img_png"),
            all_dir: dest_dir.join("img_all"),
            svg_umlet_dir: svg_dir.join("umlet"),
            svg_plantuml_dir: svg_dir.join("plantuml"),
            svg_svg_dir: svg_dir.join("svg"),
            svg_archi_dir: svg_dir.join("archi"),
            svg_dir,
            dest_dir,
            project_dir,
        }
    }

    /// Discover the project directory starting from `working_dir`.
    ///
    /// Discovery starts at the parent of `working_dir`, then strips a trailing
    /// `utils`, `img` and `src_doc` component, each at most once and in that
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProjectRootMissing`] when `working_dir` has no
    /// parent to start from.
    pub fn discover(working_dir: &Path) -> ConfigResult<Self> {
        let mut candidate = working_dir
            .parent()
            .ok_or_else(|| ConfigError::ProjectRootMissing {
                path: working_dir.to_path_buf(),
            })?;
        for marker in LAYOUT_MARKERS {
            if candidate.file_name().is_some_and(|name| name == marker) {
                candidate = candidate
                    .parent()
                    .ok_or_else(|| ConfigError::ProjectRootMissing {
                        path: working_dir.to_path_buf(),
                    })?;
            }
        }
        debug!(project_dir = %candidate.display(), "discovered project directory");
        Ok(Self::from_project_dir(candidate))
    }

    /// Resolve the layout from an explicit directory or the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or discovery
    /// fails.
    pub fn resolve(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(dir) = explicit {
            return Ok(Self::from_project_dir(dir));
        }
        let working_dir = std::env::current_dir().map_err(|source| ConfigError::Io {
            operation: "current_dir",
            source,
        })?;
        Self::discover(&working_dir)
    }

    /// Generated directories removed by the `clean` command.
    #[must_use]
    pub fn generated_dirs(&self) -> [&Path; 4] {
        [
            &self.svg_umlet_dir,
            &self.svg_plantuml_dir,
            &self.svg_svg_dir,
            &self.png_dir,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_project_dir_derives_every_directory() {
        let layout = ProjectLayout::from_project_dir("/work/handbook");
        assert_eq!(layout.project_name, "handbook");
        assert_eq!(layout.source_dir, Path::new("/work/handbook/src_doc/img"));
        assert_eq!(layout.dest_dir, Path::new("/work/handbook/temp"));
        assert_eq!(layout.png_dir, Path::new("/work/handbook/temp/img_png"));
        assert_eq!(layout.all_dir, Path::new("/work/handbook/temp/img_all"));
        assert_eq!(
            layout.svg_umlet_dir,
            Path::new("/work/handbook/temp/img_svg/umlet")
        );
        assert_eq!(
            layout.svg_plantuml_dir,
            Path::new("/work/handbook/temp/img_svg/plantuml")
        );
        assert_eq!(
            layout.svg_svg_dir,
            Path::new("/work/handbook/temp/img_svg/svg")
        );
        assert_eq!(
            layout.svg_archi_dir,
            Path::new("/work/handbook/temp/img_svg/archi")
        );
    }

    #[test]
    fn discover_strips_tool_subfolders() -> ConfigResult<()> {
        let from_utils = ProjectLayout::discover(Path::new("/work/handbook/utils/ic"))?;
        assert_eq!(from_utils.project_dir, Path::new("/work/handbook"));

        let from_img = ProjectLayout::discover(Path::new("/work/handbook/src_doc/img/tools"))?;
        assert_eq!(from_img.project_dir, Path::new("/work/handbook"));

        let plain = ProjectLayout::discover(Path::new("/work/handbook/scripts"))?;
        assert_eq!(plain.project_dir, Path::new("/work/handbook"));
        Ok(())
    }

    #[test]
    fn discover_strips_markers_only_in_order() -> ConfigResult<()> {
        // `src_doc` is checked last, so `img` above it is never revisited.
        let layout = ProjectLayout::discover(Path::new("/work/img/src_doc/x"))?;
        assert_eq!(layout.project_dir, Path::new("/work/img"));
        Ok(())
    }

    #[test]
    fn discover_without_parent_fails() {
        let result = ProjectLayout::discover(Path::new("/"));
        assert!(matches!(
            result,
            Err(ConfigError::ProjectRootMissing { .. })
        ));
    }

    #[test]
    fn resolve_prefers_explicit_directory() -> ConfigResult<()> {
        let layout = ProjectLayout::resolve(Some(Path::new("/explicit/project")))?;
        assert_eq!(layout.project_dir, Path::new("/explicit/project"));
        assert_eq!(layout.project_name, "project");
        Ok(())
    }

    #[test]
    fn generated_dirs_excludes_merge_and_archi() {
        let layout = ProjectLayout::from_project_dir("/p");
        let dirs = layout.generated_dirs();
        assert!(!dirs.contains(&layout.all_dir.as_path()));
        assert!(!dirs.contains(&layout.svg_archi_dir.as_path()));
        assert!(dirs.contains(&layout.png_dir.as_path()));
    }
}
