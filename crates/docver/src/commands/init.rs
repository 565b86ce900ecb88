//! Initialize docver in a documentation directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing docver...");

    let versions_path = config_path
        .parent()
        .unwrap_or(Path::new(""))
        .join("versions.yaml");

    let files = [
        (config_path, DEFAULT_CONFIG),
        (versions_path.as_path(), DEFAULT_VERSIONS),
    ];

    for (path, content) in files {
        if path.exists() && !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
            continue;
        }
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'docver plan' to review the builds, then 'docver build'.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# docver configuration

[project]
# Directory containing conf.py and the Makefile
workdir = "."
versions = "versions.yaml"
default_language = "en"
latest_label = "latest"

[source]
# Main line of development; conf.py and versions.yaml always come from here
main_ref = "main"
overlay = ["conf.py", "versions.yaml"]

[generator]
program = "make"
args = ["html"]
options_var = "SPHINXOPTS"
options = "-D language={language}"
output = "_build/html/*"

[publish]
# Relative to workdir
dest = "../pages"
# Base URL exported to the generator; unset means "/"
# pages_root = "https://example.org/docs/"
# "error" or "skip" when a build produces no output
on_empty = "error"

[context]
exclude_default = false
dedup = "candidate"
pages_root_default = "slash"
url_prefix = ""
branch_name = "main"
"#;

const DEFAULT_VERSIONS: &str = r#"# Published documentation versions, built in this order.
latest:
  tag: main
  languages: [en]
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use docver_versions::VersionSet;
    use tempfile::tempdir;

    #[test]
    fn writes_starter_files() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("docver.toml");

        run(&config_path, false).unwrap();

        let config = ConfigFile::load(&config_path).unwrap();
        assert_eq!(config.source.main_ref, "main");
        assert_eq!(config.publish.pages_root, None);
        let versions = VersionSet::load(&temp.path().join("versions.yaml")).unwrap();
        assert_eq!(versions.targets().len(), 1);
    }

    #[test]
    fn keeps_existing_files_without_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("docver.toml");
        fs::write(&config_path, "# mine\n").unwrap();

        run(&config_path, false).unwrap();

        assert_eq!(fs::read_to_string(&config_path).unwrap(), "# mine\n");
        assert!(temp.path().join("versions.yaml").exists());
    }

    #[test]
    fn overwrites_with_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("docver.toml");
        fs::write(&config_path, "# mine\n").unwrap();

        run(&config_path, true).unwrap();

        assert!(fs::read_to_string(&config_path)
            .unwrap()
            .contains("[generator]"));
    }
}
