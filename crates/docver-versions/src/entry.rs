//! Version entries and the build targets derived from them.

/// One declared documentation version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    /// Unique version label (e.g. "latest", "2.0")
    pub label: String,

    /// Source-control reference checked out for this version
    pub tag: String,

    /// Language codes published for this version, in declaration order
    pub languages: Vec<String>,
}

impl VersionEntry {
    /// Expand this entry into one build target per language.
    pub fn targets(&self) -> impl Iterator<Item = BuildTarget> + '_ {
        self.languages.iter().map(move |language| BuildTarget {
            version: self.label.clone(),
            language: language.clone(),
            tag: self.tag.clone(),
        })
    }

    /// Whether `language` is declared for this version.
    pub fn has_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }
}

/// One (version, language) pair to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Label of the version being built
    pub version: String,

    /// Language code being built
    pub language: String,

    /// Reference to check out
    pub tag: String,
}

impl BuildTarget {
    pub fn new(
        version: impl Into<String>,
        language: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            language: language.into(),
            tag: tag.into(),
        }
    }
}

impl std::fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({})", self.version, self.language, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_one_target_per_language() {
        let entry = VersionEntry {
            label: "2.0".to_string(),
            tag: "v2.0.0".to_string(),
            languages: vec!["en".to_string(), "de".to_string()],
        };

        let targets: Vec<_> = entry.targets().collect();

        assert_eq!(
            targets,
            vec![
                BuildTarget::new("2.0", "en", "v2.0.0"),
                BuildTarget::new("2.0", "de", "v2.0.0"),
            ]
        );
    }

    #[test]
    fn entry_without_languages_has_no_targets() {
        let entry = VersionEntry {
            label: "1.0".to_string(),
            tag: "v1".to_string(),
            languages: Vec::new(),
        };

        assert_eq!(entry.targets().count(), 0);
    }

    #[test]
    fn displays_target() {
        let target = BuildTarget::new("latest", "fr", "main");
        assert_eq!(target.to_string(), "latest/fr (main)");
    }
}
