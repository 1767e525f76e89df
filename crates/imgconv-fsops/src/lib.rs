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
#![allow(clippy::module_name_repetitions)]

//! Filesystem side of image conversion: tree walking, per-format converters,
//! deferred moves, and tree copies.
//!
//! Layout: `matcher.rs` (extension and single-file filter), `walker.rs`
//! (mirroring traversal), `command.rs` (external tool runner),
//! `converter.rs` (per-format handlers), `moves.rs` (deferred move queue),
//! `copier.rs` (generic tree copy), `convert.rs` (service tying them together).

pub mod command;
pub mod convert;
pub mod converter;
pub mod copier;
pub mod error;
pub mod matcher;
pub mod model;
pub mod moves;
pub mod walker;

pub use command::{CommandRunner, SystemRunner, ToolCommand};
pub use convert::ConversionService;
pub use converter::Converter;
pub use copier::{CopyEntry, copy_tree, copy_tree_with};
pub use error::{FsOpsError, FsOpsResult};
pub use matcher::{PathFilter, matches};
pub use model::{
    ConversionJob, ConversionReport, ExtensionPair, MoveRequest, ToolFailure, ToolOutcome,
};
pub use moves::{RetryPolicy, drain_moves};
pub use walker::walk_tree;
