//! Source-control operations on the shared working tree.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::process::{run, ProcessError};

/// Working-tree operations needed by the build loop.
pub trait SourceControl {
    /// Replace all tracked files with their versions at `reference`.
    fn checkout(&self, reference: &str) -> Result<(), ProcessError>;

    /// Restore a single `path` from `reference` on top of the current tree.
    fn overlay(&self, reference: &str, path: &Path) -> Result<(), ProcessError>;
}

/// Git command-line client operating in `workdir`.
#[derive(Debug, Clone)]
pub struct Git {
    program: OsString,
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: OsString::from("git"),
            workdir: workdir.into(),
        }
    }

    /// Use a different git executable.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn checkout_command(&self, reference: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(&self.workdir).arg("checkout").arg(reference);
        cmd
    }

    pub fn overlay_command(&self, reference: &str, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(&self.workdir)
            .arg("checkout")
            .arg(reference)
            .arg("--")
            .arg(path);
        cmd
    }
}

impl SourceControl for Git {
    fn checkout(&self, reference: &str) -> Result<(), ProcessError> {
        run(&mut self.checkout_command(reference))
    }

    fn overlay(&self, reference: &str, path: &Path) -> Result<(), ProcessError> {
        run(&mut self.overlay_command(reference, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args(cmd: &Command) -> Vec<&OsStr> {
        cmd.get_args().collect()
    }

    #[test]
    fn checkout_passes_reference_as_single_argument() {
        let git = Git::new("docs");

        let cmd = git.checkout_command("v1.0; rm -rf /");

        assert_eq!(cmd.get_program(), "git");
        assert_eq!(args(&cmd), vec!["checkout", "v1.0; rm -rf /"]);
        assert_eq!(cmd.get_current_dir(), Some(Path::new("docs")));
    }

    #[test]
    fn overlay_separates_paths_from_reference() {
        let git = Git::new(".");

        let cmd = git.overlay_command("main", Path::new("conf.py"));

        assert_eq!(args(&cmd), vec!["checkout", "main", "--", "conf.py"]);
    }

    #[test]
    fn custom_program() {
        let git = Git::new(".").with_program("/usr/local/bin/git");

        assert_eq!(
            git.checkout_command("main").get_program(),
            "/usr/local/bin/git"
        );
    }
}
