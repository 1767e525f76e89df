//! Conversion service: walk, convert, then apply deferred moves.

use std::path::Path;

use imgconv_config::RunConfig;
use tracing::info;

use crate::command::CommandRunner;
use crate::converter::Converter;
use crate::error::FsOpsResult;
use crate::matcher::PathFilter;
use crate::model::{ConversionReport, ExtensionPair};
use crate::moves::{RetryPolicy, drain_moves};
use crate::walker::walk_tree;

/// Runs conversions for one invocation.
pub struct ConversionService<'a> {
    config: &'a RunConfig,
    runner: &'a dyn CommandRunner,
    filter: Option<PathFilter>,
    retry: RetryPolicy,
}

impl<'a> ConversionService<'a> {
    /// Build a service, compiling the single-file filter when one is set.
    ///
    /// # Errors
    ///
    /// Returns an error when the filter is not a valid pattern.
    pub fn new(config: &'a RunConfig, runner: &'a dyn CommandRunner) -> FsOpsResult<Self> {
        let filter = config.flags.file.as_deref().map(PathFilter::new).transpose()?;
        Ok(Self {
            config,
            runner,
            filter,
            retry: RetryPolicy::from_attempts(config.move_attempts),
        })
    }

    /// Replace the retry policy used for deferred moves.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Configuration this service runs with.
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        self.config
    }

    /// Convert every matching file below `source_root` into `dest_root`.
    ///
    /// # Errors
    ///
    /// Returns an error on traversal failures, failed identity copies, or
    /// deferred moves that exhaust their retry budget.
    pub fn convert(
        &self,
        converter: Converter,
        source_root: &Path,
        dest_root: &Path,
        extensions: ExtensionPair,
    ) -> FsOpsResult<ConversionReport> {
        let mut report = ConversionReport::default();
        let matched = walk_tree(
            source_root,
            dest_root,
            extensions,
            self.filter.as_ref(),
            |job| converter.apply(self.config, self.runner, job, &mut report),
        )?;
        report.matched = matched;
        report.moved = drain_moves(&report.moves, &self.retry)?;
        if self.config.flags.verbose {
            info!(
                converter = converter.label(),
                matched = report.matched,
                converted = report.converted,
                moved = report.moved,
                failed = report.failures.len(),
                "conversion finished"
            );
        }
        Ok(report)
    }
}
