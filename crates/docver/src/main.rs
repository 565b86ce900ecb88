//! docver CLI - multi-version, multi-language documentation builds.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use commands::context::OutputFormat;
use config::ConfigFile;

#[derive(Parser)]
#[command(name = "docver")]
#[command(about = "Build documentation for every published version and language")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to docver.toml config file
    #[arg(short, long, default_value = "docver.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter docver.toml and versions.yaml
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the main line and every declared version/language
    Build {
        /// Publish root, relative to the project workdir (defaults to config or "../pages")
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Base URL of the published site
        #[arg(long, env = "pages_root")]
        pages_root: Option<String>,

        /// Continue when a build produced no output
        #[arg(long)]
        allow_empty: bool,
    },

    /// List the builds `build` would run, in order
    Plan,

    /// Print the navigation context for one version/language
    Context {
        /// Version label being rendered
        #[arg(long = "doc-version", env = "current_version")]
        doc_version: String,

        /// Language code being rendered
        #[arg(long, env = "current_language")]
        language: String,

        /// Base URL of the published site
        #[arg(long, env = "pages_root")]
        pages_root: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Switcher template used with --format html
        #[arg(long)]
        template: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so `context` output can be captured.
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Build {
            dest,
            pages_root,
            allow_empty,
        } => {
            let config = ConfigFile::load(&cli.config)?;
            let args = commands::build::BuildArgs {
                dest,
                pages_root,
                allow_empty,
            };
            commands::build::run(&config, args)?;
        }
        Commands::Plan => {
            let config = ConfigFile::load(&cli.config)?;
            commands::plan::run(&config)?;
        }
        Commands::Context {
            doc_version,
            language,
            pages_root,
            format,
            template,
        } => {
            let config = ConfigFile::load(&cli.config)?;
            let args = commands::context::ContextArgs {
                version: doc_version,
                language,
                pages_root,
                format,
                template,
            };
            commands::context::run(&config, args)?;
        }
    }

    Ok(())
}
