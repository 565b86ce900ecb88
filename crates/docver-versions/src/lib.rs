//! Declarative version list for multi-version documentation builds.
//!
//! This crate reads the `versions.yaml` file that maps version labels to a
//! source-control tag and the languages published for it, validates the
//! values that later become paths and process arguments, and expands the
//! collection into ordered build targets.

pub mod entry;
pub mod file;
pub mod validate;

pub use entry::{BuildTarget, VersionEntry};
pub use file::{VersionFileError, VersionSet};
