//! Per-format converters.
//!
//! Each converter turns one [`ConversionJob`] into an external tool run (or a
//! plain copy). Tool failures are recorded on the report and never abort the
//! walk; only filesystem errors from the identity copy are fatal.

use std::fs;

use imgconv_config::RunConfig;
use tracing::{debug, warn};

use crate::command::{CommandRunner, ToolCommand};
use crate::error::{FsOpsError, FsOpsResult};
use crate::model::{ConversionJob, ConversionReport, MoveRequest, ToolFailure, sibling_with_suffix};

/// Density handed to `magick` before the poster scale is applied.
pub const BASE_DENSITY: u32 = 144;
/// Output width requested from the Mermaid renderer.
pub const MERMAID_WIDTH: u32 = 1400;
/// Border margin requested from draw.io.
pub const DRAWIO_BORDER: u32 = 10;

/// Supported conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// SVG to PNG through `magick -density`.
    Rasterize,
    /// `UMLet` batch export; output lands next to the source and is moved later.
    UmletExport,
    /// Mermaid CLI export with explicit input and output.
    MermaidExport,
    /// `PlantUML` rendering through stdin/stdout.
    PlantUmlExport,
    /// draw.io export with transparent background.
    DrawioExport,
    /// Byte-for-byte copy.
    Copy,
}

impl Converter {
    /// Short name used in logs and problem lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rasterize => "magick",
            Self::UmletExport => "umlet",
            Self::MermaidExport => "mermaid",
            Self::PlantUmlExport => "plantuml",
            Self::DrawioExport => "drawio",
            Self::Copy => "copy",
        }
    }

    /// Whether the tool picks its own output path, requiring a deferred move.
    #[must_use]
    pub const fn defers_moves(self) -> bool {
        matches!(self, Self::UmletExport)
    }

    /// External command for `job`, or `None` for the identity copy.
    #[must_use]
    pub fn command(self, config: &RunConfig, job: &ConversionJob) -> Option<ToolCommand> {
        let tools = &config.tools;
        let command = match self {
            Self::Rasterize => ToolCommand::new(&tools.magick)
                .arg("-density")
                .arg(density(config.flags.poster).to_string())
                .arg(&job.source)
                .arg(&job.destination),
            Self::UmletExport => {
                let mut filename = std::ffi::OsString::from("-filename=");
                filename.push(&job.source);
                ToolCommand::new(&tools.umlet)
                    .arg("-action=convert")
                    .arg("-format=svg")
                    .arg(filename)
            }
            Self::MermaidExport => ToolCommand::new(&tools.mmdc)
                .arg("-w")
                .arg(MERMAID_WIDTH.to_string())
                .arg("-i")
                .arg(&job.source)
                .arg("-o")
                .arg(&job.destination),
            Self::PlantUmlExport => ToolCommand::new(&tools.java)
                .arg("-jar")
                .arg(&tools.plantuml_jar)
                .arg("-tsvg")
                .arg("-pipe")
                .stdin_from(&job.source)
                .stdout_to(&job.destination),
            Self::DrawioExport => ToolCommand::new(&tools.drawio)
                .arg("-x")
                .arg("--transparent")
                .arg("-s")
                .arg(format!("{:?}", config.poster_scale()))
                .arg("-b")
                .arg(DRAWIO_BORDER.to_string())
                .arg("-o")
                .arg(&job.destination)
                .arg(&job.source),
            Self::Copy => return None,
        };
        Some(command)
    }

    /// Convert one job, recording the result on `report`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the identity copy fails.
    pub fn apply(
        self,
        config: &RunConfig,
        runner: &dyn CommandRunner,
        job: &ConversionJob,
        report: &mut ConversionReport,
    ) -> FsOpsResult<()> {
        let Some(command) = self.command(config, job) else {
            fs::copy(&job.source, &job.destination)
                .map_err(|source| FsOpsError::io("copy", &job.source, source))?;
            report.converted += 1;
            return Ok(());
        };

        if config.flags.debug {
            debug!(converter = self.label(), command = %command, "running tool");
        }
        let outcome = runner.run(&command, config.tool_timeout);
        if !outcome.is_success() {
            warn!(
                converter = self.label(),
                source = %job.source.display(),
                outcome = %outcome,
                "tool failed; continuing"
            );
            report.failures.push(ToolFailure {
                converter: self.label(),
                source: job.source.clone(),
                outcome,
            });
            // A partial export left next to the source must not stay in the image tree.
            if let Some(request) = self.deferred_move(job)
                && request.produced.is_file()
            {
                report.moves.push(request);
            }
            return Ok(());
        }

        report.converted += 1;
        if let Some(request) = self.deferred_move(job) {
            report.moves.push(request);
        }
        Ok(())
    }

    fn deferred_move(self, job: &ConversionJob) -> Option<MoveRequest> {
        if !self.defers_moves() {
            return None;
        }
        sibling_with_suffix(&job.source, job.extensions.from, job.extensions.to).map(|produced| {
            MoveRequest {
                produced,
                desired: job.destination.clone(),
            }
        })
    }
}

/// Raster density for an optional poster scale (truncated like an integer cast).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn density(poster: Option<f64>) -> u32 {
    poster.map_or(BASE_DENSITY, |scale| (f64::from(BASE_DENSITY) * scale) as u32)
}
