//! Validated draft records
//!
//! A draft has one optional `[defaults]` table and a non-empty
//! `[[issues]]` array. Both shapes share the same set of optional fields;
//! issues add a required title and an optional body source.

/// Keys accepted at the top level of a draft
pub const TOP_LEVEL_KEYS: &[&str] = &["defaults", "issues"];

/// Keys accepted in `[defaults]`
pub const DEFAULT_KEYS: &[&str] = &["assignees", "labels", "milestone", "project", "repo", "template"];

/// Keys accepted in each `[[issues]]` entry
pub const ISSUE_KEYS: &[&str] = &[
    "assignees",
    "body",
    "body_file",
    "labels",
    "milestone",
    "project",
    "repo",
    "template",
    "title",
];

/// Fields that may appear in both `[defaults]` and `[[issues]]`
///
/// `None` means the key was absent from the source table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedFields {
    pub repo: Option<String>,
    pub assignees: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub milestone: Option<String>,
    /// Always a list; a bare string in the draft becomes one element
    pub project: Option<Vec<String>>,
    pub template: Option<String>,
}

impl SharedFields {
    /// Overlays `other` onto `self`: every key present on `other` replaces
    /// the value here wholesale (arrays are not concatenated).
    pub fn overlaid_with(&self, other: &SharedFields) -> SharedFields {
        SharedFields {
            repo: other.repo.clone().or_else(|| self.repo.clone()),
            assignees: other.assignees.clone().or_else(|| self.assignees.clone()),
            labels: other.labels.clone().or_else(|| self.labels.clone()),
            milestone: other.milestone.clone().or_else(|| self.milestone.clone()),
            project: other.project.clone().or_else(|| self.project.clone()),
            template: other.template.clone().or_else(|| self.template.clone()),
        }
    }
}

/// The `[defaults]` table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultsRecord {
    pub fields: SharedFields,
}

/// One `[[issues]]` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRecord {
    /// Zero-based position in the `issues` array
    pub index: usize,
    pub title: String,
    pub body: Option<String>,
    pub body_file: Option<String>,
    pub fields: SharedFields,
}

impl IssueRecord {
    /// Creates an issue with only a title
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            body: None,
            body_file: None,
            fields: SharedFields::default(),
        }
    }

    /// Path prefix used in diagnostics, e.g. `issues[3]`
    pub fn path(&self) -> String {
        issue_path(self.index)
    }
}

/// Output of the schema validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    pub defaults: DefaultsRecord,
    pub issues: Vec<IssueRecord>,
}

pub(crate) fn issue_path(index: usize) -> String {
    format!("issues[{}]", index)
}
