//! Moving generated output into the publish tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::MatchOptions;
use serde::Deserialize;
use walkdir::WalkDir;

/// What to do when the source pattern matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyPolicy {
    /// Fail: the generator produced no output
    #[default]
    Error,
    /// Log a warning and continue
    Skip,
}

/// Errors that can occur while relocating output.
#[derive(Debug, thiserror::Error)]
pub enum RelocateError {
    #[error("Invalid source pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },

    #[error("Failed to read {0}")]
    Read(String),

    #[error("Nothing matches {0}")]
    NothingToMove(String),

    #[error("Refusing to overwrite existing output: {}", .0.display())]
    Exists(PathBuf),

    #[error("Failed to move {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Move everything matching `source_glob` into `destination`.
///
/// `destination` and its parents are created if needed. Entries already
/// present in `destination` are never replaced. Dotfiles only match a
/// pattern that names the leading dot. Returns the number of moved entries.
pub fn relocate(
    source_glob: &str,
    destination: &Path,
    on_empty: EmptyPolicy,
) -> Result<usize, RelocateError> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let paths = glob::glob_with(source_glob, options).map_err(|e| RelocateError::Pattern {
        pattern: source_glob.to_string(),
        message: e.to_string(),
    })?;

    let mut matches = Vec::new();
    for entry in paths {
        matches.push(entry.map_err(|e| RelocateError::Read(e.to_string()))?);
    }

    fs::create_dir_all(destination).map_err(|e| RelocateError::Io {
        path: destination.to_path_buf(),
        source: e,
    })?;

    if matches.is_empty() {
        return match on_empty {
            EmptyPolicy::Error => Err(RelocateError::NothingToMove(source_glob.to_string())),
            EmptyPolicy::Skip => {
                tracing::warn!("Nothing to relocate for {}", source_glob);
                Ok(0)
            }
        };
    }

    // Check every target before moving anything.
    let mut moves = Vec::with_capacity(matches.len());
    for path in matches {
        let Some(name) = path.file_name() else {
            return Err(RelocateError::Read(path.display().to_string()));
        };
        let target = destination.join(name);

        if fs::symlink_metadata(&target).is_ok() {
            return Err(RelocateError::Exists(target));
        }

        moves.push((path, target));
    }

    for (path, target) in &moves {
        move_entry(path, target)?;
    }

    tracing::debug!(
        "Moved {} entries into {}",
        moves.len(),
        destination.display()
    );

    Ok(moves.len())
}

fn move_entry(source: &Path, target: &Path) -> Result<(), RelocateError> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_tree(source, target)?;
            remove_entry(source)
        }
        Err(e) => Err(RelocateError::Io {
            path: source.to_path_buf(),
            source: e,
        }),
    }
}

/// Copy a file or directory tree to `target`.
fn copy_tree(source: &Path, target: &Path) -> Result<(), RelocateError> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| RelocateError::Read(e.to_string()))?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let dest = if relative.as_os_str().is_empty() {
            target.to_path_buf()
        } else {
            target.join(relative)
        };

        let io_err = |e: io::Error| RelocateError::Io {
            path: entry.path().to_path_buf(),
            source: e,
        };

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(io_err)?;
        } else {
            fs::copy(entry.path(), &dest).map_err(io_err)?;
        }
    }
    Ok(())
}

fn remove_entry(path: &Path) -> Result<(), RelocateError> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| RelocateError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
