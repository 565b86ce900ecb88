//! Dry run of the build loop.

use std::io::{self, Write};

use anyhow::{Context, Result};
use docver_versions::VersionSet;

use crate::config::ConfigFile;

/// Run the plan command.
///
/// Prints one tab-separated line per build: version, language, tag and
/// publish directory.
pub fn run(config: &ConfigFile) -> Result<()> {
    let versions_path = config.versions_path();
    let versions = VersionSet::load_or_empty(&versions_path)
        .with_context(|| format!("Failed to load {}", versions_path.display()))?;

    let plan = config.driver_config().plan(&versions);
    tracing::info!("{} builds planned", plan.len());

    let mut out = io::stdout().lock();
    for planned in plan {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            planned.target.version,
            planned.target.language,
            planned.target.tag,
            planned.destination.display()
        )?;
    }

    Ok(())
}
