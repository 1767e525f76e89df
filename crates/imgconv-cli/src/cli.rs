//! Argument parsing, configuration assembly, and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use imgconv_config::{ProjectLayout, RunConfig, RunFlags, ToolPaths, defaults};
use imgconv_fsops::{CommandRunner, SystemRunner};
use imgconv_telemetry::{LogFormat, LoggingConfig, RunContextGuard, init_logging, level_for_flags};
use tracing::{debug, info};

use crate::commands::clean::handle_clean;
use crate::commands::convert::{Pipeline, handle_convert};
use crate::commands::merge::handle_merge;
use crate::context::{AppContext, CliError, CliResult};
use crate::output::{START_BANNER, Summary, render_summary};

/// Parses CLI arguments, installs logging, executes the requested command,
/// and prints the summary. Returns the process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        level: level_for_flags(cli.verbose, cli.debug),
        format: cli.log_format.into(),
    };
    if let Err(err) = init_logging(&logging) {
        let err = CliError::from(err);
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }

    println!("{START_BANNER}");
    match execute(&cli, &SystemRunner) {
        Ok(summary) => {
            println!("\n{}", render_summary(&summary));
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn execute(cli: &Cli, runner: &dyn CommandRunner) -> CliResult<Summary> {
    let command = cli.command;
    let config = build_config(cli)?;
    let _run = RunContextGuard::new(&config.layout.project_name, command_label(command));
    if config.flags.verbose {
        info!(project_dir = %config.layout.project_dir.display(), "project resolved");
    }
    debug!(config = %config.to_json(), "resolved configuration");

    let ctx = AppContext::new(&config, runner);
    ctx.progress(&format!("starts with the command {}", command_label(command)));

    let problems = match command {
        Some(Command::Clean) => {
            handle_clean(&ctx)?;
            Vec::new()
        }
        other => {
            let problems = handle_convert(&ctx, pipelines_for(other))?;
            handle_merge(&ctx)?;
            problems
        }
    };
    Ok(Summary { problems })
}

fn build_config(cli: &Cli) -> CliResult<RunConfig> {
    let layout = ProjectLayout::resolve(cli.project_dir.as_deref())?;
    let flags = RunFlags {
        verbose: cli.verbose,
        debug: cli.debug,
        poster: cli.poster,
        file: cli.file.clone(),
    };
    let config = RunConfig::new(layout, flags, cli.tools.to_paths())?
        .with_tool_timeout(cli.tool_timeout)?
        .with_move_attempts(cli.move_attempts)?;
    Ok(config)
}

const fn command_label(command: Option<Command>) -> &'static str {
    match command {
        None => "all",
        Some(Command::Clean) => "clean",
        Some(Command::Umlet) => "umlet",
        Some(Command::Plantuml) => "plantuml",
        Some(Command::Mermaid) => "mermaid",
        Some(Command::Drawio) => "drawio",
        Some(Command::Cppng) => "cppng",
        Some(Command::Svg) => "svg",
        Some(Command::Archi) => "archi",
    }
}

fn pipelines_for(command: Option<Command>) -> &'static [Pipeline] {
    match command {
        None => &Pipeline::ALL,
        Some(Command::Clean) => &[],
        Some(Command::Umlet) => &[Pipeline::Umlet],
        Some(Command::Plantuml) => &[Pipeline::PlantUml],
        Some(Command::Mermaid) => &[Pipeline::Mermaid],
        Some(Command::Drawio) => &[Pipeline::Drawio],
        Some(Command::Cppng) => &[Pipeline::CopyPng],
        Some(Command::Svg) => &[Pipeline::Svg],
        Some(Command::Archi) => &[Pipeline::Archi],
    }
}

#[derive(Parser)]
#[command(
    name = "imgconv",
    about = "Convert documentation diagrams (UMLet, PlantUML, Mermaid, draw.io, SVG) into PNG"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Be more verbose")]
    verbose: bool,
    #[arg(
        short,
        long,
        global = true,
        help = "Log tool command lines and other low-level detail (implies --verbose)"
    )]
    debug: bool,
    #[arg(
        short,
        long,
        global = true,
        help = "Scale factor for poster output, e.g. 4"
    )]
    poster: Option<f64>,
    #[arg(
        short,
        long,
        global = true,
        help = "Process only files whose path below the image root matches this pattern"
    )]
    file: Option<String>,
    #[arg(
        long,
        global = true,
        env = "IMGCONV_PROJECT_DIR",
        help = "Project directory (discovered from the working directory when omitted)"
    )]
    project_dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_enum,
        env = "IMGCONV_LOG_FORMAT",
        default_value_t = LogFormatArg::Pretty
    )]
    log_format: LogFormatArg,
    #[arg(
        long,
        global = true,
        env = "IMGCONV_TOOL_TIMEOUT",
        help = "Kill an external tool after this many seconds"
    )]
    tool_timeout: Option<u64>,
    #[arg(
        long,
        global = true,
        env = "IMGCONV_MOVE_ATTEMPTS",
        default_value_t = defaults::MOVE_ATTEMPTS,
        help = "Attempts for each deferred move before giving up"
    )]
    move_attempts: u32,
    #[command(flatten)]
    tools: ToolArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct ToolArgs {
    #[arg(long, global = true, env = "IMGCONV_MAGICK", default_value = defaults::MAGICK)]
    magick: PathBuf,
    #[arg(long, global = true, env = "IMGCONV_UMLET", default_value = defaults::UMLET)]
    umlet: PathBuf,
    #[arg(long, global = true, env = "IMGCONV_MMDC", default_value = defaults::MMDC)]
    mmdc: PathBuf,
    #[arg(long, global = true, env = "IMGCONV_JAVA", default_value = defaults::JAVA)]
    java: PathBuf,
    #[arg(
        long,
        global = true,
        env = "IMGCONV_PLANTUML_JAR",
        default_value = defaults::PLANTUML_JAR
    )]
    plantuml_jar: PathBuf,
    #[arg(long, global = true, env = "IMGCONV_DRAWIO", default_value = defaults::DRAWIO)]
    drawio: PathBuf,
}

impl ToolArgs {
    fn to_paths(&self) -> ToolPaths {
        ToolPaths {
            magick: self.magick.clone(),
            umlet: self.umlet.clone(),
            mmdc: self.mmdc.clone(),
            java: self.java.clone(),
            plantuml_jar: self.plantuml_jar.clone(),
            drawio: self.drawio.clone(),
        }
    }
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    /// Remove all generated files and folders
    Clean,
    /// UMLet diagrams -> svg -> png
    Umlet,
    /// PlantUML diagrams -> svg -> png
    Plantuml,
    /// Mermaid diagrams -> png
    Mermaid,
    /// draw.io diagrams -> png
    Drawio,
    /// Copy png files from the source tree into the png output
    Cppng,
    /// Copy svg files and render them to png
    Svg,
    /// Render hand-placed svg/archi exports to png
    Archi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::time::Duration;

    use anyhow::{Result, anyhow};
    use clap::error::ErrorKind;
    use imgconv_fsops::{ToolCommand, ToolOutcome};
    use imgconv_test_support::{TempTree, relative_files};

    #[derive(Default)]
    struct RecordingRunner {
        commands: RefCell<Vec<ToolCommand>>,
        outcome: Option<ToolOutcome>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, command: &ToolCommand, _timeout: Option<Duration>) -> ToolOutcome {
            self.commands.borrow_mut().push(command.clone());
            self.outcome.clone().unwrap_or(ToolOutcome::Succeeded)
        }
    }

    fn parse(args: &[&str]) -> Result<Cli> {
        Ok(Cli::try_parse_from(
            std::iter::once("imgconv").chain(args.iter().copied()),
        )?)
    }

    fn execute_in(tree: &TempTree, args: &[&str], runner: &RecordingRunner) -> Result<Summary> {
        let project = tree.path().to_string_lossy().into_owned();
        let mut full = vec!["--project-dir", project.as_str()];
        full.extend_from_slice(args);
        execute(&parse(&full)?, runner).map_err(|err| anyhow!(err.display_message()))
    }

    #[test]
    fn no_subcommand_means_everything() -> Result<()> {
        let cli = parse(&[])?;
        assert_eq!(cli.command, None);
        assert_eq!(command_label(cli.command), "all");
        assert_eq!(pipelines_for(cli.command), &Pipeline::ALL);
        assert!(!cli.verbose);
        assert_eq!(cli.move_attempts, 100);
        assert_eq!(cli.tools.to_paths(), ToolPaths::default());
        Ok(())
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() -> Result<()> {
        let cli = parse(&["mermaid", "--poster", "2", "-f", "sub/diagram", "-d"])?;
        assert_eq!(cli.command, Some(Command::Mermaid));
        assert_eq!(cli.poster, Some(2.0));
        assert_eq!(cli.file.as_deref(), Some("sub/diagram"));
        assert!(cli.debug);
        assert_eq!(pipelines_for(cli.command), &[Pipeline::Mermaid]);
        Ok(())
    }

    #[test]
    fn tool_overrides_and_log_format_parse() -> Result<()> {
        let cli = parse(&[
            "--magick",
            "/opt/im/magick",
            "--plantuml-jar",
            "/opt/plantuml.jar",
            "--log-format",
            "json",
            "--tool-timeout",
            "30",
        ])?;
        let tools = cli.tools.to_paths();
        assert_eq!(tools.magick, PathBuf::from("/opt/im/magick"));
        assert_eq!(tools.plantuml_jar, PathBuf::from("/opt/plantuml.jar"));
        assert_eq!(tools.umlet, PathBuf::from("umlet"));
        assert_eq!(LogFormat::from(cli.log_format), LogFormat::Json);
        assert_eq!(cli.tool_timeout, Some(30));
        Ok(())
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["imgconv", "publish"]).is_err());
        let err = Cli::try_parse_from(["imgconv", "--poster", "big"]).err();
        assert_eq!(err.map(|err| err.kind()), Some(ErrorKind::ValueValidation));
    }

    #[test]
    fn cppng_copies_and_merges() -> Result<()> {
        let tree = TempTree::new()?;
        tree.write("src_doc/img/a.png", "a")?;
        tree.write("src_doc/img/sub/b.png", "b")?;
        tree.write("src_doc/img/old/c.png", "c")?;
        let runner = RecordingRunner::default();

        let summary = execute_in(&tree, &["cppng"], &runner)?;

        assert!(summary.is_ok());
        assert!(runner.commands.borrow().is_empty());
        assert_eq!(
            relative_files(&tree.join("temp/img_all"))?,
            vec!["a.png", "sub/b.png"]
        );
        Ok(())
    }

    #[test]
    fn poster_flag_reaches_raster_density() -> Result<()> {
        let tree = TempTree::new()?;
        tree.write("temp/img_svg/archi/view.svg", "<svg/>")?;
        let runner = RecordingRunner::default();

        execute_in(&tree, &["--poster", "2", "archi"], &runner)?;

        let commands = runner.commands.borrow();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].arg_strings()[..2], ["-density", "288"]);
        Ok(())
    }

    #[test]
    fn failed_tools_are_listed_as_problems() -> Result<()> {
        let tree = TempTree::new()?;
        tree.write("src_doc/img/flow.mmd", "graph TD")?;
        let runner = RecordingRunner {
            outcome: Some(ToolOutcome::Exited { code: Some(1) }),
            ..RecordingRunner::default()
        };

        let summary = execute_in(&tree, &["mermaid"], &runner)?;

        assert_eq!(summary.problems.len(), 1);
        assert!(summary.problems[0].starts_with("mermaid exited with status 1"));
        assert!(tree.join("temp/img_all").is_dir());
        Ok(())
    }

    #[test]
    fn clean_runs_no_pipeline() {
        assert!(pipelines_for(Some(Command::Clean)).is_empty());
        assert_eq!(pipelines_for(Some(Command::Svg)), &[Pipeline::Svg]);
    }

    #[test]
    fn clean_skips_the_merge() -> Result<()> {
        let tree = TempTree::new()?;
        tree.write("temp/img_png/a.png", "a")?;
        let runner = RecordingRunner::default();

        let summary = execute_in(&tree, &["clean"], &runner)?;

        assert!(summary.is_ok());
        assert!(!tree.join("temp/img_png").exists());
        assert!(!tree.join("temp/img_all").exists());
        Ok(())
    }

    #[test]
    fn invalid_poster_is_a_validation_error() -> Result<()> {
        let tree = TempTree::new()?;
        let project = tree.path().to_string_lossy().into_owned();
        let cli = parse(&["--project-dir", project.as_str(), "--poster", "0", "archi"])?;
        let Err(err) = execute(&cli, &RecordingRunner::default()) else {
            return Err(anyhow!("expected validation error"));
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().starts_with("invalid poster"));
        Ok(())
    }

    #[test]
    fn zero_move_attempts_is_a_validation_error() -> Result<()> {
        let tree = TempTree::new()?;
        let project = tree.path().to_string_lossy().into_owned();
        let cli = parse(&["--project-dir", project.as_str(), "--move-attempts", "0"])?;
        let Err(err) = execute(&cli, &RecordingRunner::default()) else {
            return Err(anyhow!("expected validation error"));
        };
        assert_eq!(err.exit_code(), 2);
        Ok(())
    }

    #[test]
    fn umlet_output_that_never_appears_is_fatal() -> Result<()> {
        let tree = TempTree::new()?;
        tree.write("src_doc/img/a.uxf", "<diagram/>")?;
        let project = tree.path().to_string_lossy().into_owned();
        let cli = parse(&[
            "--project-dir",
            project.as_str(),
            "--move-attempts",
            "1",
            "umlet",
        ])?;

        let Err(err) = execute(&cli, &RecordingRunner::default()) else {
            return Err(anyhow!("expected move failure"));
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().starts_with("could not move"));
        assert!(!fs::exists(tree.join("temp/img_all"))?);
        Ok(())
    }
}
