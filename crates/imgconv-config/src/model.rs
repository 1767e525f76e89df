//! Typed run configuration.
//!
//! # Design
//! - Pure data carriers built once per invocation and never mutated.
//! - Validation happens in the constructor so downstream crates can trust
//!   every field.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::defaults;
use crate::error::ConfigResult;
use crate::layout::ProjectLayout;
use crate::validate::{validate_move_attempts, validate_poster, validate_tool_timeout};

/// Flags supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunFlags {
    /// Emit progress detail.
    pub verbose: bool,
    /// Emit constructed command lines and other low-level detail.
    pub debug: bool,
    /// Poster scale factor applied to raster density and drawing scale.
    pub poster: Option<f64>,
    /// Single-file filter pattern matched against relative source paths.
    pub file: Option<String>,
}

/// Locations of the external converters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolPaths {
    /// `ImageMagick` entrypoint.
    pub magick: PathBuf,
    /// `UMLet` executable.
    pub umlet: PathBuf,
    /// Mermaid CLI.
    pub mmdc: PathBuf,
    /// Java runtime used to host `PlantUML`.
    pub java: PathBuf,
    /// `PlantUML` jar.
    pub plantuml_jar: PathBuf,
    /// draw.io executable.
    pub drawio: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            magick: PathBuf::from(defaults::MAGICK),
            umlet: PathBuf::from(defaults::UMLET),
            mmdc: PathBuf::from(defaults::MMDC),
            java: PathBuf::from(defaults::JAVA),
            plantuml_jar: PathBuf::from(defaults::PLANTUML_JAR),
            drawio: PathBuf::from(defaults::DRAWIO),
        }
    }
}

/// Immutable configuration for one command invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    /// Resolved project directories.
    pub layout: ProjectLayout,
    /// Command-line flags.
    pub flags: RunFlags,
    /// External converter locations.
    pub tools: ToolPaths,
    /// Upper bound for a single external tool run; `None` waits forever.
    pub tool_timeout: Option<Duration>,
    /// Attempts allowed for each deferred move.
    pub move_attempts: u32,
}

impl RunConfig {
    /// Build a validated configuration with default timeout and retry budget.
    ///
    /// `debug` implies `verbose`.
    ///
    /// # Errors
    ///
    /// Returns an error if the poster scale is invalid.
    pub fn new(layout: ProjectLayout, mut flags: RunFlags, tools: ToolPaths) -> ConfigResult<Self> {
        flags.poster = validate_poster(flags.poster)?;
        flags.verbose |= flags.debug;
        Ok(Self {
            layout,
            flags,
            tools,
            tool_timeout: None,
            move_attempts: defaults::MOVE_ATTEMPTS,
        })
    }

    /// Replace the tool timeout (in seconds).
    ///
    /// # Errors
    ///
    /// Returns an error if a zero timeout is requested.
    pub fn with_tool_timeout(mut self, seconds: Option<u64>) -> ConfigResult<Self> {
        self.tool_timeout = validate_tool_timeout(seconds)?;
        Ok(self)
    }

    /// Replace the deferred-move attempt budget.
    ///
    /// # Errors
    ///
    /// Returns an error if zero attempts are requested.
    pub fn with_move_attempts(mut self, attempts: u32) -> ConfigResult<Self> {
        self.move_attempts = validate_move_attempts(attempts)?;
        Ok(self)
    }

    /// Poster scale, defaulting to `1.0`.
    #[must_use]
    pub fn poster_scale(&self) -> f64 {
        self.flags.poster.unwrap_or(1.0)
    }

    /// Render the configuration as JSON for debug logging.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
    }
}
