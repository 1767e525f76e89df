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

//! Run configuration for a single imgconv invocation.
//!
//! Layout: `layout.rs` (project root discovery and derived directories),
//! `model.rs` (flags, tool locations, the immutable `RunConfig`),
//! `validate.rs` (flag validation), `defaults.rs` (tool names and constants).

pub mod defaults;
pub mod error;
pub mod layout;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use layout::ProjectLayout;
pub use model::{RunConfig, RunFlags, ToolPaths};
