//! Full multi-version build command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use docver_driver::{BuildDriver, CommandGenerator, EmptyPolicy, Git};

use crate::config::ConfigFile;

/// Command-line overrides of the `[publish]` section.
#[derive(Debug, Default)]
pub struct BuildArgs {
    pub dest: Option<PathBuf>,
    pub pages_root: Option<String>,
    pub allow_empty: bool,
}

/// Run the build command.
pub fn run(file_config: &ConfigFile, args: BuildArgs) -> Result<()> {
    tracing::info!("Building documentation...");

    let report = driver(file_config, args)
        .run_all()
        .context("Documentation build failed")?;

    tracing::info!(
        "Ran {} builds, published {} entries in {}ms",
        report.builds,
        report.relocated,
        report.duration_ms
    );

    tracing::info!("Output: {}", report.dest_root.display());

    Ok(())
}

/// Wire the configured git and generator commands into a driver.
pub fn driver(file_config: &ConfigFile, args: BuildArgs) -> BuildDriver<Git, CommandGenerator> {
    let mut config = file_config.driver_config();
    if let Some(dest) = args.dest {
        config.dest_root = dest;
    }
    // An empty value counts as unset so the context default applies.
    if let Some(pages_root) = args.pages_root.filter(|p| !p.is_empty()) {
        config.pages_root = Some(pages_root);
    }
    if args.allow_empty {
        config.on_empty = EmptyPolicy::Skip;
    }

    let source = Git::new(config.workdir.clone()).with_program(file_config.source.git.clone());

    let generator_config = &file_config.generator;
    let mut generator =
        CommandGenerator::new(generator_config.program.clone(), config.workdir.clone())
            .args(generator_config.args.iter().cloned());
    if !generator_config.options_var.is_empty() {
        generator = generator.options(
            generator_config.options_var.clone(),
            generator_config.options.clone(),
        );
    }

    BuildDriver::new(config, source, generator)
}
