//! The multi-version build loop.

use std::path::{Path, PathBuf};
use std::time::Instant;

use docver_versions::{BuildTarget, VersionFileError, VersionSet};

use crate::generator::{BuildEnv, Generator};
use crate::process::ProcessError;
use crate::relocate::{relocate, EmptyPolicy, RelocateError};
use crate::source::SourceControl;

/// Configuration for a full documentation build.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Working tree the generator runs in
    pub workdir: PathBuf,

    /// Version file, relative to `workdir`
    pub versions_file: PathBuf,

    /// Reference of the main line of development
    pub main_ref: String,

    /// Files restored from `main_ref` after every checkout, relative to `workdir`
    pub overlay: Vec<PathBuf>,

    /// Label of the unversioned main-line build
    pub latest_label: String,

    /// Language of the unversioned main-line build
    pub default_language: String,

    /// Pattern matching the generator output, relative to `workdir`
    pub output_glob: String,

    /// Publish root, relative to `workdir` unless absolute
    pub dest_root: PathBuf,

    /// Base URL handed to the generator, if any
    pub pages_root: Option<String>,

    pub on_empty: EmptyPolicy,

    /// Check `main_ref` back out once every build succeeded
    pub restore: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            versions_file: PathBuf::from("versions.yaml"),
            main_ref: "main".to_string(),
            overlay: vec![PathBuf::from("conf.py"), PathBuf::from("versions.yaml")],
            latest_label: "latest".to_string(),
            default_language: "en".to_string(),
            output_glob: "_build/html/*".to_string(),
            dest_root: PathBuf::from("../pages"),
            pages_root: None,
            on_empty: EmptyPolicy::Error,
            restore: true,
        }
    }
}

impl DriverConfig {
    /// Publish root as seen from the current directory.
    pub fn publish_root(&self) -> PathBuf {
        anchored_path(&self.workdir, &self.dest_root)
    }

    /// The unversioned main-line build, published at the root.
    pub fn main_build(&self) -> PlannedBuild {
        PlannedBuild {
            target: BuildTarget::new(&self.latest_label, &self.default_language, &self.main_ref),
            destination: self.publish_root(),
        }
    }

    /// Every build a full run performs for `versions`, in order.
    pub fn plan(&self, versions: &VersionSet) -> Vec<PlannedBuild> {
        let mut builds = vec![self.main_build()];
        builds.extend(versions.targets().into_iter().map(|t| self.planned(t)));
        builds
    }

    /// Publish `target` under `<dest_root>/<version>/<language>`.
    fn planned(&self, target: BuildTarget) -> PlannedBuild {
        PlannedBuild {
            destination: self
                .publish_root()
                .join(&target.version)
                .join(&target.language),
            target,
        }
    }
}

/// A build target and where its output is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedBuild {
    pub target: BuildTarget,
    pub destination: PathBuf,
}

/// Result of a full build.
#[derive(Debug)]
pub struct BuildReport {
    /// Number of generator runs
    pub builds: usize,

    /// Number of entries moved into the publish tree
    pub relocated: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    pub dest_root: PathBuf,
}

/// Errors that abort a build. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to load version list: {0}")]
    Versions(#[from] VersionFileError),

    #[error("Failed to check out {reference}: {source}")]
    Checkout {
        reference: String,
        #[source]
        source: ProcessError,
    },

    #[error("Failed to restore {} from {reference}: {source}", path.display())]
    Overlay {
        reference: String,
        path: PathBuf,
        #[source]
        source: ProcessError,
    },

    #[error("Generator failed for {target}: {source}")]
    Generate {
        target: String,
        #[source]
        source: ProcessError,
    },

    #[error("Failed to relocate output of {target}: {source}")]
    Relocate {
        target: String,
        #[source]
        source: RelocateError,
    },
}

/// Renders every declared version/language into the publish tree.
pub struct BuildDriver<S, G> {
    config: DriverConfig,
    source: S,
    generator: G,
}

impl<S: SourceControl, G: Generator> BuildDriver<S, G> {
    pub fn new(config: DriverConfig, source: S, generator: G) -> Self {
        Self {
            config,
            source,
            generator,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Build the main line, then every declared version and language.
    ///
    /// The version file is read after the main-line build so the list
    /// always comes from `main_ref`. The first failure stops the run;
    /// output already published is left in place.
    pub fn run_all(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let mut builds = 0;
        let mut relocated = 0;

        let main = self.config.main_build();
        relocated += self.build_and_publish(&main)?;
        builds += 1;

        let versions_path = self.config.workdir.join(&self.config.versions_file);
        let versions = VersionSet::load_or_empty(&versions_path)?;
        if versions.is_empty() {
            tracing::info!("No versions declared in {}", versions_path.display());
        }

        for target in versions.targets() {
            let planned = self.config.planned(target);
            relocated += self.build_and_publish(&planned)?;
            builds += 1;
        }

        if self.config.restore {
            self.checkout(&self.config.main_ref)?;
        }

        Ok(BuildReport {
            builds,
            relocated,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            dest_root: self.config.publish_root(),
        })
    }

    /// Check out `target.tag`, overlay the main-line build files and run
    /// the generator.
    pub fn build_one(&self, target: &BuildTarget) -> Result<(), BuildError> {
        tracing::info!("Building {}", target);

        self.checkout(&target.tag)?;

        for path in &self.config.overlay {
            self.source
                .overlay(&self.config.main_ref, path)
                .map_err(|e| BuildError::Overlay {
                    reference: self.config.main_ref.clone(),
                    path: path.clone(),
                    source: e,
                })?;
        }

        let env = BuildEnv {
            version: target.version.clone(),
            language: target.language.clone(),
            pages_root: self.config.pages_root.clone(),
            build_all: true,
        };

        self.generator
            .generate(&env)
            .map_err(|e| BuildError::Generate {
                target: target.to_string(),
                source: e,
            })
    }

    fn build_and_publish(&self, planned: &PlannedBuild) -> Result<usize, BuildError> {
        self.build_one(&planned.target)?;

        let moved = relocate(&self.output_pattern(), &planned.destination, self.config.on_empty)
            .map_err(|e| BuildError::Relocate {
                target: planned.target.to_string(),
                source: e,
            })?;

        tracing::info!(
            "Published {} to {}",
            planned.target,
            planned.destination.display()
        );

        Ok(moved)
    }

    fn checkout(&self, reference: &str) -> Result<(), BuildError> {
        self.source
            .checkout(reference)
            .map_err(|e| BuildError::Checkout {
                reference: reference.to_string(),
                source: e,
            })
    }

    /// Output pattern anchored at the working tree.
    fn output_pattern(&self) -> String {
        anchored_pattern(&self.config.workdir, &self.config.output_glob)
    }
}

fn anchored_path(workdir: &Path, path: &Path) -> PathBuf {
    if workdir.as_os_str().is_empty() || workdir == Path::new(".") {
        return path.to_path_buf();
    }
    workdir.join(path)
}

fn anchored_pattern(workdir: &Path, pattern: &str) -> String {
    if workdir.as_os_str().is_empty() || workdir == Path::new(".") {
        return pattern.to_string();
    }
    let base = glob::Pattern::escape(&workdir.display().to_string());
    format!("{}/{}", base.trim_end_matches('/'), pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::{tempdir, TempDir};

    type Log = Rc<RefCell<Vec<String>>>;

    struct FakeSource {
        log: Log,
    }

    impl SourceControl for FakeSource {
        fn checkout(&self, reference: &str) -> Result<(), ProcessError> {
            self.log.borrow_mut().push(format!("checkout {reference}"));
            Ok(())
        }

        fn overlay(&self, reference: &str, path: &Path) -> Result<(), ProcessError> {
            self.log
                .borrow_mut()
                .push(format!("overlay {reference} {}", path.display()));
            Ok(())
        }
    }

    /// Writes one page into the output directory, failing for `fail_version`.
    struct FakeGenerator {
        log: Log,
        output: PathBuf,
        fail_version: Option<String>,
    }

    impl Generator for FakeGenerator {
        fn generate(&self, env: &BuildEnv) -> Result<(), ProcessError> {
            self.log
                .borrow_mut()
                .push(format!("generate {}/{}", env.version, env.language));

            if self.fail_version.as_deref() == Some(env.version.as_str()) {
                return Err(ProcessError::Failed {
                    program: "make".to_string(),
                    status: "exit status: 2".to_string(),
                });
            }

            fs::create_dir_all(&self.output).unwrap();
            fs::write(
                self.output.join("index.html"),
                format!("{}/{}", env.version, env.language),
            )
            .unwrap();
            Ok(())
        }
    }

    struct Fixture {
        temp: TempDir,
        log: Log,
    }

    impl Fixture {
        fn new(versions: Option<&str>) -> Self {
            let temp = tempdir().unwrap();
            fs::create_dir_all(temp.path().join("docs")).unwrap();
            if let Some(versions) = versions {
                fs::write(temp.path().join("docs/versions.yaml"), versions).unwrap();
            }
            Self {
                temp,
                log: Rc::default(),
            }
        }

        fn workdir(&self) -> PathBuf {
            self.temp.path().join("docs")
        }

        fn pages(&self) -> PathBuf {
            self.temp.path().join("pages")
        }

        fn driver(&self, fail_version: Option<&str>) -> BuildDriver<FakeSource, FakeGenerator> {
            let config = DriverConfig {
                workdir: self.workdir(),
                dest_root: self.pages(),
                ..Default::default()
            };
            BuildDriver::new(
                config,
                FakeSource {
                    log: Rc::clone(&self.log),
                },
                FakeGenerator {
                    log: Rc::clone(&self.log),
                    output: self.workdir().join("_build/html"),
                    fail_version: fail_version.map(str::to_string),
                },
            )
        }

        fn generated(&self) -> Vec<String> {
            self.log
                .borrow()
                .iter()
                .filter_map(|l| l.strip_prefix("generate ").map(str::to_string))
                .collect()
        }
    }

    const VERSIONS: &str = r#"
latest:
  tag: main
  languages: [en, de]
"2.0":
  tag: v2.0.0
  languages: [en, fr, de]
"1.0":
  tag: v1.0.0
  languages: [en]
"#;

    #[test]
    fn builds_main_line_first_then_every_target() {
        let fixture = Fixture::new(Some(VERSIONS));

        let report = fixture.driver(None).run_all().unwrap();

        assert_eq!(report.builds, 1 + 2 + 3 + 1);
        assert_eq!(
            fixture.generated(),
            vec![
                "latest/en",
                "latest/en",
                "latest/de",
                "2.0/en",
                "2.0/fr",
                "2.0/de",
                "1.0/en",
            ]
        );
    }

    #[test]
    fn publishes_into_namespaced_directories() {
        let fixture = Fixture::new(Some(VERSIONS));

        fixture.driver(None).run_all().unwrap();

        let pages = fixture.pages();
        assert_eq!(
            fs::read_to_string(pages.join("index.html")).unwrap(),
            "latest/en"
        );
        assert_eq!(
            fs::read_to_string(pages.join("2.0/fr/index.html")).unwrap(),
            "2.0/fr"
        );
        assert_eq!(
            fs::read_to_string(pages.join("1.0/en/index.html")).unwrap(),
            "1.0/en"
        );
    }

    #[test]
    fn overlays_build_files_after_each_checkout() {
        let fixture = Fixture::new(Some("\"1.0\":\n  tag: v1.0.0\n  languages: [en]\n"));

        fixture.driver(None).run_all().unwrap();

        assert_eq!(
            *fixture.log.borrow(),
            vec![
                "checkout main",
                "overlay main conf.py",
                "overlay main versions.yaml",
                "generate latest/en",
                "checkout v1.0.0",
                "overlay main conf.py",
                "overlay main versions.yaml",
                "generate 1.0/en",
                "checkout main",
            ]
        );
    }

    #[test]
    fn missing_version_file_builds_only_main_line() {
        let fixture = Fixture::new(None);

        let report = fixture.driver(None).run_all().unwrap();

        assert_eq!(report.builds, 1);
        assert_eq!(fixture.generated(), vec!["latest/en"]);
        assert!(fixture.pages().join("index.html").exists());
    }

    #[test]
    fn empty_version_file_builds_only_main_line() {
        let fixture = Fixture::new(Some(""));

        let report = fixture.driver(None).run_all().unwrap();

        assert_eq!(report.builds, 1);
    }

    #[test]
    fn failure_stops_later_versions_and_keeps_earlier_output() {
        let fixture = Fixture::new(Some(VERSIONS));

        let result = fixture.driver(Some("2.0")).run_all();

        assert!(matches!(result, Err(BuildError::Generate { .. })));
        assert_eq!(
            fixture.generated(),
            vec!["latest/en", "latest/en", "latest/de", "2.0/en"]
        );
        let pages = fixture.pages();
        assert!(pages.join("latest/de/index.html").exists());
        assert!(!pages.join("2.0").exists());
        assert!(!pages.join("1.0").exists());
        // No restore after a failed run.
        assert_eq!(
            fixture.log.borrow().last().map(String::as_str),
            Some("generate 2.0/en")
        );
    }

    #[test]
    fn invalid_version_file_is_fatal_after_main_build() {
        let fixture = Fixture::new(Some("- not\n- a mapping\n"));

        let result = fixture.driver(None).run_all();

        assert!(matches!(result, Err(BuildError::Versions(_))));
        assert_eq!(fixture.generated(), vec!["latest/en"]);
    }

    #[test]
    fn missing_output_is_fatal_by_default() {
        let fixture = Fixture::new(None);
        let mut driver = fixture.driver(None);
        driver.generator.output = fixture.workdir().join("elsewhere");

        let result = driver.run_all();

        assert!(matches!(result, Err(BuildError::Relocate { .. })));
    }

    #[test]
    fn plan_matches_run_order() {
        let fixture = Fixture::new(None);
        let driver = fixture.driver(None);
        let versions = VersionSet::parse(VERSIONS).unwrap();

        let plan = driver.config().plan(&versions);

        assert_eq!(plan.len(), 7);
        assert_eq!(plan[0].destination, fixture.pages());
        assert_eq!(plan[0].target, BuildTarget::new("latest", "en", "main"));
        assert_eq!(plan[4].target, BuildTarget::new("2.0", "fr", "v2.0.0"));
        assert_eq!(plan[4].destination, fixture.pages().join("2.0").join("fr"));
    }

    #[test]
    fn publish_root_is_relative_to_workdir() {
        let config = DriverConfig {
            workdir: PathBuf::from("docs"),
            ..Default::default()
        };
        assert_eq!(config.publish_root(), PathBuf::from("docs/../pages"));
        assert_eq!(config.main_build().destination, PathBuf::from("docs/../pages"));

        let config = DriverConfig::default();
        assert_eq!(config.publish_root(), PathBuf::from("../pages"));

        let config = DriverConfig {
            workdir: PathBuf::from("docs"),
            dest_root: PathBuf::from("/srv/pages"),
            ..Default::default()
        };
        assert_eq!(config.publish_root(), PathBuf::from("/srv/pages"));
    }

    #[test]
    fn anchors_output_pattern_at_workdir() {
        assert_eq!(anchored_pattern(Path::new("."), "_build/html/*"), "_build/html/*");
        assert_eq!(
            anchored_pattern(Path::new("docs/"), "_build/html/*"),
            "docs/_build/html/*"
        );
        assert_eq!(
            anchored_pattern(Path::new("docs[1]"), "out/*"),
            "docs[[]1[]]/out/*"
        );
    }
}
