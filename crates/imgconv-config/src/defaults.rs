//! Default tool locations and conversion constants.
//!
//! # Design
//! - Tool defaults are bare program names so `PATH` lookup applies.
//! - Every value here can be overridden from the CLI or environment.

/// `ImageMagick` entrypoint used for SVG to PNG rasterisation.
pub const MAGICK: &str = "magick";
/// `UMLet` executable used for batch `.uxf` export.
pub const UMLET: &str = "umlet";
/// Mermaid CLI renderer.
pub const MMDC: &str = "mmdc";
/// Java runtime hosting the `PlantUML` jar.
pub const JAVA: &str = "java";
/// `PlantUML` jar passed to `java -jar`.
pub const PLANTUML_JAR: &str = "plantuml.jar";
/// draw.io desktop executable.
pub const DRAWIO: &str = "drawio";

/// Directory names stripped while walking up to the project root.
pub const LAYOUT_MARKERS: [&str; 3] = ["utils", "img", "src_doc"];

/// Default number of attempts for a deferred move before giving up.
pub const MOVE_ATTEMPTS: u32 = 100;
