//! External documentation generator invocation.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::process::{run, ProcessError};

/// Environment variable carrying the version label being rendered.
pub const CURRENT_VERSION_VAR: &str = "current_version";
/// Environment variable carrying the language code being rendered.
pub const CURRENT_LANGUAGE_VAR: &str = "current_language";
pub const BUILD_ALL_DOCS_VAR: &str = "build_all_docs";
pub const PAGES_ROOT_VAR: &str = "pages_root";

/// Parameters of one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEnv {
    pub version: String,
    pub language: String,
    /// Base URL of the published site; not exported when unset
    pub pages_root: Option<String>,
    /// Whether this run is part of a full multi-version build
    pub build_all: bool,
}

impl BuildEnv {
    /// Variables exported to the generator process.
    pub fn vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![
            (CURRENT_VERSION_VAR, self.version.clone()),
            (CURRENT_LANGUAGE_VAR, self.language.clone()),
            (
                BUILD_ALL_DOCS_VAR,
                if self.build_all { "True" } else { "False" }.to_string(),
            ),
        ];
        if let Some(pages_root) = &self.pages_root {
            vars.push((PAGES_ROOT_VAR, pages_root.clone()));
        }
        vars
    }
}

/// Produces the documentation for one build target in the working tree.
pub trait Generator {
    fn generate(&self, env: &BuildEnv) -> Result<(), ProcessError>;
}

/// Generator driven by an external command such as `make html`.
///
/// The build parameters reach the child only through its own environment;
/// nothing is set on the driver process.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: OsString,
    args: Vec<OsString>,
    workdir: PathBuf,
    options_var: Option<String>,
    options_template: String,
}

impl CommandGenerator {
    pub fn new(program: impl Into<OsString>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: workdir.into(),
            options_var: None,
            options_template: String::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Export `template` as `var`, with `{language}` and `{version}`
    /// replaced by the build target.
    pub fn options(mut self, var: impl Into<String>, template: impl Into<String>) -> Self {
        self.options_var = Some(var.into());
        self.options_template = template.into();
        self
    }

    /// Generator option string for `env`.
    pub fn render_options(&self, env: &BuildEnv) -> String {
        self.options_template
            .replace("{language}", &env.language)
            .replace("{version}", &env.version)
    }

    pub fn command(&self, env: &BuildEnv) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(&self.workdir).args(&self.args);
        cmd.envs(env.vars());
        if let Some(var) = &self.options_var {
            cmd.env(var, self.render_options(env));
        }
        cmd
    }
}

impl Generator for CommandGenerator {
    fn generate(&self, env: &BuildEnv) -> Result<(), ProcessError> {
        run(&mut self.command(env))
    }
}
