//! Navigation context construction.

use std::path::Path;

use docver_versions::{VersionFileError, VersionSet};
use serde::{Deserialize, Serialize};

/// A named link in the switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

impl Link {
    fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionName {
    pub name: String,
}

/// Version links grouped the way the switcher template expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Versions {
    /// One link per declared version
    pub tags: Vec<Link>,
    /// The main line of development
    pub branches: Vec<Link>,
}

/// Metadata consumed by the templating layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationContext {
    pub current_language: String,
    /// Languages of the current version, unique by name
    pub languages: Vec<Link>,
    pub current_version: VersionName,
    pub versions: Versions,
}

/// Which name a declared language is compared against before it is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupKey {
    /// Skip a candidate whose name is already in the list
    #[default]
    Candidate,
    /// Skip a candidate equal to the language being built
    Target,
}

/// Fallback for the main-line link when no pages root is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagesRootDefault {
    #[default]
    Slash,
    Empty,
}

impl PagesRootDefault {
    fn as_str(self) -> &'static str {
        match self {
            Self::Slash => "/",
            Self::Empty => "",
        }
    }
}

/// Policy knobs for context construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextOptions {
    /// Leave the default version out of `versions.tags`
    pub exclude_default: bool,

    /// Label of the synthetic default version
    pub default_label: String,

    pub dedup: DedupKey,

    pub pages_root_default: PagesRootDefault,

    /// Prepended to every generated URL (e.g. "/my-project")
    pub url_prefix: String,

    /// Display name of the main-line branch link
    pub branch_name: String,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            exclude_default: false,
            default_label: "latest".to_string(),
            dedup: DedupKey::default(),
            pages_root_default: PagesRootDefault::default(),
            url_prefix: String::new(),
            branch_name: "main".to_string(),
        }
    }
}

/// The build being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRequest {
    pub version: String,
    pub language: String,
    /// Base URL of the published site, if known
    pub pages_root: Option<String>,
}

impl ContextRequest {
    pub fn new(version: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            language: language.into(),
            pages_root: None,
        }
    }

    pub fn with_pages_root(mut self, pages_root: impl Into<String>) -> Self {
        self.pages_root = Some(pages_root.into());
        self
    }
}

/// Errors that can occur while building the context.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Versions(#[from] VersionFileError),

    #[error("Version {0:?} is not declared in the version file")]
    UnknownVersion(String),
}

impl NavigationContext {
    /// Build the context for `request` from an already loaded version set.
    pub fn build(
        versions: &VersionSet,
        request: &ContextRequest,
        options: &ContextOptions,
    ) -> Result<Self, ContextError> {
        let entry = versions
            .get(&request.version)
            .ok_or_else(|| ContextError::UnknownVersion(request.version.clone()))?;

        let language_url =
            |lang: &str| format!("{}/{}/{}", options.url_prefix, request.version, lang);

        let mut languages = vec![Link::new(
            &request.language,
            language_url(request.language.as_str()),
        )];
        for lang in &entry.languages {
            let skip = match options.dedup {
                DedupKey::Candidate => languages.iter().any(|l| &l.name == lang),
                DedupKey::Target => *lang == request.language,
            };
            if !skip {
                languages.push(Link::new(lang, language_url(lang.as_str())));
            }
        }

        let tags = versions
            .entries()
            .iter()
            .filter(|v| !(options.exclude_default && v.label == options.default_label))
            .map(|v| {
                Link::new(
                    &v.tag,
                    format!("{}/{}/{}", options.url_prefix, v.label, request.language),
                )
            })
            .collect();

        let pages_root = request
            .pages_root
            .clone()
            .unwrap_or_else(|| options.pages_root_default.as_str().to_string());

        Ok(Self {
            current_language: request.language.clone(),
            languages,
            current_version: VersionName {
                name: request.version.clone(),
            },
            versions: Versions {
                tags,
                branches: vec![Link::new(&options.branch_name, pages_root)],
            },
        })
    }

    /// Serialize as the JSON object handed to the templating layer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Read the version file at `versions_path` and build the context.
///
/// Unlike the build loop, a missing version file is an error here: every
/// version being rendered has to be resolvable.
pub fn build_context(
    versions_path: &Path,
    request: &ContextRequest,
    options: &ContextOptions,
) -> Result<NavigationContext, ContextError> {
    let versions = VersionSet::load(versions_path)?;
    NavigationContext::build(&versions, request, options)
}
