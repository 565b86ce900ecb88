//! Loading and parsing of the declarative version file.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::entry::{BuildTarget, VersionEntry};
use crate::validate::{is_valid_label, is_valid_language, is_valid_tag};

/// Ordered collection of declared versions.
///
/// Order is the insertion order of the version file, which is also the
/// build order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSet {
    entries: Vec<VersionEntry>,
}

/// Raw shape of one version in the file, before validation.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    tag: Option<Value>,
    #[serde(default)]
    languages: Option<Vec<String>>,
}

impl VersionSet {
    /// Build a set from already-validated entries.
    pub fn new(entries: Vec<VersionEntry>) -> Result<Self, VersionFileError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.label.clone()) {
                return Err(VersionFileError::DuplicateLabel(entry.label.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Parse the YAML text of a version file.
    ///
    /// An empty document (only comments, or a bare `null`) is an empty set.
    pub fn parse(source: &str) -> Result<Self, VersionFileError> {
        let blank = source.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(Self::default());
        }

        let document: Value = serde_yaml::from_str(source)
            .map_err(|e| VersionFileError::InvalidYaml(e.to_string()))?;

        let mapping = match document {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            _ => return Err(VersionFileError::NotAMapping),
        };

        let mut entries = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let label = scalar_to_string(&key)?.ok_or(VersionFileError::InvalidKey)?;
            entries.push(parse_entry(label, value)?);
        }

        Self::new(entries)
    }

    /// Load a version file that must exist.
    pub fn load(path: &Path) -> Result<Self, VersionFileError> {
        let content = fs::read_to_string(path).map_err(|e| VersionFileError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Load a version file, treating a missing file as an empty set.
    pub fn load_or_empty(path: &Path) -> Result<Self, VersionFileError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(VersionFileError::Read {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    /// Look up a version by label.
    pub fn get(&self, label: &str) -> Option<&VersionEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Declared versions in file order.
    pub fn entries(&self) -> &[VersionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Cross product of versions and their languages, in file order.
    pub fn targets(&self) -> Vec<BuildTarget> {
        self.entries.iter().flat_map(VersionEntry::targets).collect()
    }
}

fn parse_entry(label: String, value: Value) -> Result<VersionEntry, VersionFileError> {
    if !is_valid_label(&label) {
        return Err(VersionFileError::InvalidLabel(label));
    }

    if value.is_null() {
        return Err(VersionFileError::MissingTag(label));
    }

    let raw: RawEntry = serde_yaml::from_value(value).map_err(|e| VersionFileError::InvalidEntry {
        label: label.clone(),
        message: e.to_string(),
    })?;

    let tag = raw
        .tag
        .as_ref()
        .map(scalar_to_string)
        .transpose()?
        .flatten()
        .ok_or_else(|| VersionFileError::MissingTag(label.clone()))?;

    if !is_valid_tag(&tag) {
        return Err(VersionFileError::InvalidTag { label, tag });
    }

    let languages = raw.languages.unwrap_or_default();
    let mut seen = HashSet::new();
    for language in &languages {
        if !is_valid_language(language) {
            return Err(VersionFileError::InvalidLanguage {
                label,
                language: language.clone(),
            });
        }
        if !seen.insert(language.as_str()) {
            return Err(VersionFileError::DuplicateLanguage {
                label,
                language: language.clone(),
            });
        }
    }

    Ok(VersionEntry {
        label,
        tag,
        languages,
    })
}

/// Unquoted `3:` keys and `tag: 7` values arrive as integers. Floats are
/// rejected: `1.10` reads back as `1.1`.
fn scalar_to_string(value: &Value) -> Result<Option<String>, VersionFileError> {
    match value {
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Some(n.to_string())),
        Value::Number(n) => Err(VersionFileError::UnquotedNumber(n.to_string())),
        _ => Ok(None),
    }
}

/// Errors that can occur when reading the version file.
#[derive(Debug, thiserror::Error)]
pub enum VersionFileError {
    #[error("Failed to read version file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid YAML in version file: {0}")]
    InvalidYaml(String),

    #[error("Version file must be a mapping of version labels")]
    NotAMapping,

    #[error("Version labels must be strings or numbers")]
    InvalidKey,

    #[error("Unquoted number {0} in version file; quote labels and tags such as \"1.10\"")]
    UnquotedNumber(String),

    #[error("Invalid version label: {0:?}")]
    InvalidLabel(String),

    #[error("Duplicate version label: {0}")]
    DuplicateLabel(String),

    #[error("Invalid entry for version {label}: {message}")]
    InvalidEntry { label: String, message: String },

    #[error("Version {0} has no tag")]
    MissingTag(String),

    #[error("Invalid tag {tag:?} for version {label}")]
    InvalidTag { label: String, tag: String },

    #[error("Invalid language code {language:?} for version {label}")]
    InvalidLanguage { label: String, language: String },

    #[error("Language {language} is declared twice for version {label}")]
    DuplicateLanguage { label: String, language: String },
}
