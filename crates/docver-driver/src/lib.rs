//! Multi-version documentation build driver.
//!
//! Checks out every declared version, overlays the current build
//! configuration from the main line, runs the external generator once per
//! language and moves each result into a version/language namespaced
//! publish directory. Builds run strictly one after another because they
//! share a single working tree.

pub mod driver;
pub mod generator;
pub mod process;
pub mod relocate;
pub mod source;

pub use driver::{BuildDriver, BuildError, BuildReport, DriverConfig, PlannedBuild};
pub use generator::{BuildEnv, CommandGenerator, Generator};
pub use process::ProcessError;
pub use relocate::{relocate, EmptyPolicy, RelocateError};
pub use source::{Git, SourceControl};
