//! Configuration file structure (docver.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use docver_context::{ContextOptions, DedupKey, PagesRootDefault};
use docver_driver::{DriverConfig, EmptyPolicy};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub context: ContextConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory the generator runs in
    pub workdir: PathBuf,
    /// Version file, relative to `workdir`
    pub versions: PathBuf,
    pub default_language: String,
    pub latest_label: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            versions: PathBuf::from("versions.yaml"),
            default_language: "en".to_string(),
            latest_label: "latest".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    #[serde(default = "default_main_ref")]
    pub main_ref: String,
    #[serde(default = "default_overlay")]
    pub overlay: Vec<PathBuf>,
    #[serde(default = "default_true")]
    pub restore: bool,
    #[serde(default = "default_git")]
    pub git: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            main_ref: default_main_ref(),
            overlay: default_overlay(),
            restore: true,
            git: default_git(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Variable receiving the option string; empty disables it
    pub options_var: String,
    pub options: String,
    /// Generator output, relative to the working directory
    pub output: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "make".to_string(),
            args: vec!["html".to_string()],
            options_var: "SPHINXOPTS".to_string(),
            options: "-D language={language}".to_string(),
            output: "_build/html/*".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Publish root, relative to `project.workdir` unless absolute
    pub dest: PathBuf,
    /// Exported to the generator as `pages_root` when set
    pub pages_root: Option<String>,
    pub on_empty: EmptyPolicy,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            dest: PathBuf::from("../pages"),
            pages_root: None,
            on_empty: EmptyPolicy::Error,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextConfig {
    pub exclude_default: bool,
    pub dedup: DedupKey,
    pub pages_root_default: PagesRootDefault,
    pub url_prefix: String,
    pub branch_name: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            exclude_default: false,
            dedup: DedupKey::Candidate,
            pages_root_default: PagesRootDefault::Slash,
            url_prefix: String::new(),
            branch_name: "main".to_string(),
        }
    }
}

fn default_main_ref() -> String {
    "main".to_string()
}
fn default_overlay() -> Vec<PathBuf> {
    vec![PathBuf::from("conf.py"), PathBuf::from("versions.yaml")]
}
fn default_true() -> bool {
    true
}
fn default_git() -> String {
    "git".to_string()
}

impl ConfigFile {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            let config = Self::parse(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
            tracing::info!("Loaded config from {}", path.display());
            return Ok(config);
        }
        tracing::debug!("No config at {}, using defaults", path.display());
        Ok(Self::default())
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Path of the version file as seen from the current directory.
    pub fn versions_path(&self) -> PathBuf {
        self.project.workdir.join(&self.project.versions)
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            workdir: self.project.workdir.clone(),
            versions_file: self.project.versions.clone(),
            main_ref: self.source.main_ref.clone(),
            overlay: self.source.overlay.clone(),
            latest_label: self.project.latest_label.clone(),
            default_language: self.project.default_language.clone(),
            output_glob: self.generator.output.clone(),
            dest_root: self.publish.dest.clone(),
            pages_root: self.publish.pages_root.clone(),
            on_empty: self.publish.on_empty,
            restore: self.source.restore,
        }
    }

    pub fn context_options(&self) -> ContextOptions {
        ContextOptions {
            exclude_default: self.context.exclude_default,
            default_label: self.project.latest_label.clone(),
            dedup: self.context.dedup,
            pages_root_default: self.context.pages_root_default,
            url_prefix: self.context.url_prefix.clone(),
            branch_name: self.context.branch_name.clone(),
        }
    }
}
