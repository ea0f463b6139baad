//! Loading draft files from disk
//!
//! Reads the file, runs the validator and the merge, and tags every
//! failure with the file path so messages read
//! `drafts/q3.toml: issues[2].labels[0]: must be a string`.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{merge_all, validate_document, MergeError, MergedItem, RepoPolicy, SchemaError};

/// What went wrong while loading a draft
#[derive(Debug, Error)]
pub enum DraftFileError {
    #[error("file not found")]
    NotFound,

    #[error("failed to read: {0}")]
    Read(#[source] io::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// A [`DraftFileError`] tied to the file it came from
#[derive(Debug)]
pub struct DraftError {
    pub path: PathBuf,
    pub kind: DraftFileError,
}

impl std::error::Error for DraftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Multi-violation schema errors get the path on every line
        let message = self.kind.to_string();
        let lines: Vec<String> = message
            .lines()
            .map(|line| format!("{}: {}", self.path.display(), line))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}

/// A draft read from disk
#[derive(Debug, Clone)]
pub struct DraftFile {
    path: PathBuf,
    dir: PathBuf,
    text: String,
}

impl DraftFile {
    /// Reads a draft file
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, DraftError> {
        let path = path.into();
        let wrap = |kind| DraftError {
            path: path.clone(),
            kind,
        };

        let text = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                wrap(DraftFileError::NotFound)
            } else {
                wrap(DraftFileError::Read(e))
            }
        })?;

        let absolute = std::path::absolute(&path).map_err(|e| wrap(DraftFileError::Read(e)))?;
        let dir = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        Ok(Self { path, dir, text })
    }

    /// Path as given on the command line
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute directory containing the draft
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validates and merges the draft
    pub fn merged_items(&self, policy: RepoPolicy) -> Result<Vec<MergedItem>, DraftError> {
        self.try_merged_items(policy).map_err(|kind| DraftError {
            path: self.path.clone(),
            kind,
        })
    }

    fn try_merged_items(&self, policy: RepoPolicy) -> Result<Vec<MergedItem>, DraftFileError> {
        let draft = validate_document(&self.text)?;
        Ok(merge_all(&draft.defaults, &draft.issues, policy)?)
    }
}

/// Reads, validates and merges a draft in one step
pub fn load_draft(path: impl Into<PathBuf>, policy: RepoPolicy) -> Result<(DraftFile, Vec<MergedItem>), DraftError> {
    let file = DraftFile::read(path)?;
    let items = file.merged_items(policy)?;
    Ok((file, items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_draft(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn loads_and_merges() {
        let dir = TempDir::new().unwrap();
        let path = write_draft(
            &dir,
            "draft.toml",
            "[defaults]\nrepo = \"org/repo\"\n[[issues]]\ntitle = \"A\"\n[[issues]]\ntitle = \"B\"\nrepo = \"org/other\"\n",
        );

        let (file, items) = load_draft(&path, RepoPolicy::Required).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].repo(), Some("org/repo"));
        assert_eq!(items[1].repo(), Some("org/other"));
        assert!(file.dir().is_absolute());
        assert_eq!(file.dir(), std::path::absolute(dir.path()).unwrap());
    }

    #[test]
    fn missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");

        let err = DraftFile::read(&path).unwrap_err();
        assert!(matches!(err.kind, DraftFileError::NotFound));
        assert_eq!(err.to_string(), format!("{}: file not found", path.display()));
    }

    #[test]
    fn schema_errors_carry_the_path() {
        let dir = TempDir::new().unwrap();
        let path = write_draft(
            &dir,
            "bad.toml",
            "[[issues]]\ntitle = \"A\"\nlabels = [1]\nmilestone = 2\n",
        );

        let err = load_draft(&path, RepoPolicy::Optional).unwrap_err();
        let shown = path.display().to_string();
        assert_eq!(
            err.to_string(),
            format!(
                "{0}: issues[0].labels[0]: must be a string\n{0}: issues[0].milestone: must be a string",
                shown
            )
        );
    }

    #[test]
    fn merge_errors_carry_the_path() {
        let dir = TempDir::new().unwrap();
        let path = write_draft(&dir, "norepo.toml", "[[issues]]\ntitle = \"A\"\n");

        assert!(load_draft(&path, RepoPolicy::Optional).is_ok());

        let err = load_draft(&path, RepoPolicy::Required).unwrap_err();
        assert!(matches!(err.kind, DraftFileError::Merge(MergeError::MissingRepo { .. })));
        assert_eq!(
            err.to_string(),
            format!(
                "{}: issues[0] missing repo (set defaults.repo or issues[0].repo)",
                path.display()
            )
        );
    }

    #[test]
    fn parse_errors_carry_the_path() {
        let dir = TempDir::new().unwrap();
        let path = write_draft(&dir, "broken.toml", "[[issues]\n");

        let err = load_draft(&path, RepoPolicy::Optional).unwrap_err();
        assert!(err
            .to_string()
            .starts_with(&format!("{}: TOML parse error: ", path.display())));
    }
}
