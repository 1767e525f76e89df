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

//! Telemetry primitives shared across the imgconv workspace.
//!
//! Layout: `init.rs` (subscriber installation and level selection),
//! `context.rs` (run-scoped spans), `error.rs` (telemetry errors).

pub mod context;
pub mod error;
pub mod init;

pub use context::RunContextGuard;
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging, level_for_flags};
