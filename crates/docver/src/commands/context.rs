//! Navigation context command, called from the generator's configuration.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use docver_context::{build_context, ContextRequest, SwitcherRenderer};

use crate::config::ConfigFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Context object for the templating layer
    Json,
    /// Rendered switcher fragment
    Html,
}

pub struct ContextArgs {
    pub version: String,
    pub language: String,
    pub pages_root: Option<String>,
    pub format: OutputFormat,
    pub template: Option<PathBuf>,
}

/// Run the context command.
pub fn run(config: &ConfigFile, args: ContextArgs) -> Result<()> {
    let output = render(config, args)?;

    let mut out = io::stdout().lock();
    writeln!(out, "{}", output)?;

    Ok(())
}

/// Build the context and format it as requested.
pub fn render(config: &ConfigFile, args: ContextArgs) -> Result<String> {
    let mut request = ContextRequest::new(args.version, args.language);
    // An exported but empty pages_root falls back to the configured default.
    request.pages_root = args.pages_root.filter(|p| !p.is_empty());

    let versions_path = config.versions_path();
    let context = build_context(&versions_path, &request, &config.context_options())
        .with_context(|| format!("Failed to build navigation from {}", versions_path.display()))?;

    let output = match args.format {
        OutputFormat::Json => context.to_json()?,
        OutputFormat::Html => {
            let renderer = match args.template {
                Some(path) => {
                    let source = fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    SwitcherRenderer::with_template(source)?
                }
                None => SwitcherRenderer::new(),
            };
            renderer.render(&context)?
        }
    };

    Ok(output)
}
