#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Command-line front end that converts a project's documentation diagrams.
//!
//! Layout:
//! - `cli.rs`: argument parsing, configuration assembly, and command dispatch
//! - `commands/`: clean, conversion pipelines, and the merge step
//! - `context.rs`: shared run context, errors, and progress logging
//! - `output.rs`: banner, progress lines, and the final summary
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod commands;
pub(crate) mod context;
pub(crate) mod output;

pub use cli::run;
