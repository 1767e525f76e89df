//! Conversion pipelines, one per diagram family.

use std::path::Path;

use imgconv_fsops::{ConversionReport, ConversionService, Converter, ExtensionPair};

use crate::context::{AppContext, CliResult};

const UXF_TO_SVG: ExtensionPair = ExtensionPair::new(".uxf", ".svg");
const PUML_TO_SVG: ExtensionPair = ExtensionPair::new(".puml", ".svg");
const DRAWIO_TO_PNG: ExtensionPair = ExtensionPair::new(".drawio", ".png");
const MMD_TO_PNG: ExtensionPair = ExtensionPair::new(".mmd", ".png");
const SVG_TO_SVG: ExtensionPair = ExtensionPair::new(".svg", ".svg");
const SVG_TO_PNG: ExtensionPair = ExtensionPair::new(".svg", ".png");
const PNG_TO_PNG: ExtensionPair = ExtensionPair::new(".png", ".png");

/// Named conversion pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pipeline {
    Umlet,
    PlantUml,
    Drawio,
    Mermaid,
    Svg,
    CopyPng,
    Archi,
}

impl Pipeline {
    /// Execution order when no command is given.
    pub(crate) const ALL: [Self; 7] = [
        Self::Umlet,
        Self::PlantUml,
        Self::Drawio,
        Self::Mermaid,
        Self::Svg,
        Self::CopyPng,
        Self::Archi,
    ];

    const fn subject(self) -> &'static str {
        match self {
            Self::Umlet => "umlet",
            Self::PlantUml => "plantuml",
            Self::Drawio => "drawio",
            Self::Mermaid => "mermaid",
            Self::Svg => "svg",
            Self::CopyPng => "png copy",
            Self::Archi => "svg/archi",
        }
    }

    /// Run every step of the pipeline, returning the per-step reports.
    pub(crate) fn run(
        self,
        ctx: &AppContext<'_>,
        service: &ConversionService<'_>,
    ) -> CliResult<Vec<ConversionReport>> {
        let layout = &ctx.config.layout;
        let source = layout.source_dir.as_path();
        let png = layout.png_dir.as_path();

        ctx.progress(&format!("start {}", self.subject()));
        let reports = match self {
            Self::Umlet => vec![
                service.convert(
                    Converter::UmletExport,
                    source,
                    &layout.svg_umlet_dir,
                    UXF_TO_SVG,
                )?,
                rasterize(service, &layout.svg_umlet_dir, png)?,
            ],
            Self::PlantUml => vec![
                service.convert(
                    Converter::PlantUmlExport,
                    source,
                    &layout.svg_plantuml_dir,
                    PUML_TO_SVG,
                )?,
                rasterize(service, &layout.svg_plantuml_dir, png)?,
            ],
            Self::Drawio => vec![service.convert(
                Converter::DrawioExport,
                source,
                png,
                DRAWIO_TO_PNG,
            )?],
            Self::Mermaid => vec![service.convert(
                Converter::MermaidExport,
                source,
                png,
                MMD_TO_PNG,
            )?],
            Self::Svg => vec![
                service.convert(Converter::Copy, source, &layout.svg_svg_dir, SVG_TO_SVG)?,
                rasterize(service, &layout.svg_svg_dir, png)?,
            ],
            Self::CopyPng => vec![service.convert(Converter::Copy, source, png, PNG_TO_PNG)?],
            Self::Archi => vec![rasterize(service, &layout.svg_archi_dir, png)?],
        };
        ctx.progress(&format!("done {}", self.subject()));
        Ok(reports)
    }
}

fn rasterize(
    service: &ConversionService<'_>,
    svg_dir: &Path,
    png_dir: &Path,
) -> CliResult<ConversionReport> {
    Ok(service.convert(Converter::Rasterize, svg_dir, png_dir, SVG_TO_PNG)?)
}

/// Run `pipelines` in order and collect every soft failure as a problem line.
pub(crate) fn handle_convert(
    ctx: &AppContext<'_>,
    pipelines: &[Pipeline],
) -> CliResult<Vec<String>> {
    let service = ConversionService::new(ctx.config, ctx.runner)?;
    let mut problems = Vec::new();
    for pipeline in pipelines {
        for report in pipeline.run(ctx, &service)? {
            problems.extend(report.failures.iter().map(ToString::to_string));
        }
    }
    Ok(problems)
}
