//! Command handlers grouped by concern.

pub(crate) mod clean;
pub(crate) mod convert;
pub(crate) mod merge;
