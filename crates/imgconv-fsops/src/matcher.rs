//! Path matching for the tree walker.
//!
//! A file is selected when its name ends with the required extension and,
//! when a single-file filter is active, its extension-stripped path relative
//! to the walk root matches the filter from the start.

use std::path::Path;

use regex::Regex;

use crate::error::{FsOpsError, FsOpsResult};

/// Compiled single-file filter.
#[derive(Debug, Clone)]
pub struct PathFilter {
    pattern: String,
    regex: Regex,
}

impl PathFilter {
    /// Compile `pattern` with backslashes normalised to `/`.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::InvalidFilter`] when the pattern is not a valid regex.
    pub fn new(pattern: &str) -> FsOpsResult<Self> {
        let normalized = normalize_separators(pattern);
        let regex =
            Regex::new(&format!("^(?:{normalized})")).map_err(|source| FsOpsError::InvalidFilter {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Pattern as supplied by the caller.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Match from the start of `candidate`; trailing text is allowed.
    #[must_use]
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// Decide whether `path` under `root` should be processed.
#[must_use]
pub fn matches(root: &Path, path: &Path, extension: &str, filter: Option<&PathFilter>) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    if !name.ends_with(extension) {
        return false;
    }
    let Some(filter) = filter else {
        return true;
    };
    normalized_stem(root, path).is_some_and(|stem| filter.is_match(&stem))
}

/// Relative path of `path` below `root`, `/`-separated, final extension removed.
#[must_use]
pub fn normalized_stem(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let joined = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Some(joined)
}

fn normalize_separators(value: &str) -> String {
    value.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> &'static Path {
        Path::new("/doc/img")
    }

    #[test]
    fn extension_is_an_exact_case_sensitive_suffix() {
        assert!(matches(root(), Path::new("/doc/img/a.uxf"), ".uxf", None));
        assert!(!matches(root(), Path::new("/doc/img/a.UXF"), ".uxf", None));
        assert!(!matches(root(), Path::new("/doc/img/a.uxf.bak"), ".uxf", None));
    }

    #[test]
    fn filter_matches_from_start_of_relative_stem() -> FsOpsResult<()> {
        let filter = PathFilter::new("sub/diagram")?;
        assert!(matches(
            root(),
            Path::new("/doc/img/sub/diagram.mmd"),
            ".mmd",
            Some(&filter)
        ));
        assert!(!matches(
            root(),
            Path::new("/doc/img/sub/other.mmd"),
            ".mmd",
            Some(&filter)
        ));
        assert!(!matches(
            root(),
            Path::new("/doc/img/other/sub/diagram.mmd"),
            ".mmd",
            Some(&filter)
        ));
        Ok(())
    }

    #[test]
    fn filter_is_not_a_full_match() -> FsOpsResult<()> {
        let filter = PathFilter::new("sub/dia")?;
        assert!(matches(
            root(),
            Path::new("/doc/img/sub/diagram.mmd"),
            ".mmd",
            Some(&filter)
        ));
        Ok(())
    }

    #[test]
    fn filter_normalises_backslashes_and_supports_regex() -> FsOpsResult<()> {
        let filter = PathFilter::new("flows/.*_v2")?;
        assert!(filter.is_match("flows/login_v2"));
        assert!(!filter.is_match("legacy/flows/login_v2"));
        assert_eq!(filter.pattern(), "flows/.*_v2");
        assert_eq!(normalize_separators(r"sub\diagram"), "sub/diagram");
        Ok(())
    }

    #[test]
    fn invalid_filter_is_rejected() {
        assert!(matches!(
            PathFilter::new("(unclosed"),
            Err(FsOpsError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn normalized_stem_strips_only_final_extension() {
        assert_eq!(
            normalized_stem(root(), Path::new("/doc/img/a/b.v1.uxf")).as_deref(),
            Some("a/b.v1")
        );
        assert_eq!(normalized_stem(root(), Path::new("/elsewhere/b.uxf")), None);
    }
}
