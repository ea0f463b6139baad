//! Overlay of `[[issues]]` entries onto `[defaults]`
//!
//! Each issue starts from a copy of the defaults and replaces every key it
//! sets. Cross-field rules are checked on the merged result, so a conflict
//! can come from either side.

use thiserror::Error;

use super::draft::{DefaultsRecord, IssueRecord, SharedFields};

#[derive(Debug, Error, PartialEq)]
pub enum MergeError {
    #[error("{path} has both body and body_file after defaults/issue merge")]
    BodyConflict { path: String },

    #[error("{path} missing repo (set defaults.repo or {path}.repo)")]
    MissingRepo { path: String },
}

/// Whether merged items must name a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoPolicy {
    /// Apply mode: every item is sent to the tool and needs a target
    Required,
    /// Validate-only mode
    Optional,
}

/// Where the issue body comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    /// Literal text, possibly empty
    Inline(String),
    /// Path as written in the draft, not yet resolved
    File(String),
}

/// One issue with defaults applied and cross-field rules checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedItem {
    /// Zero-based position in the source `issues` array
    pub index: usize,
    pub title: String,
    pub body: Option<BodySource>,
    pub fields: SharedFields,
}

impl MergedItem {
    pub fn repo(&self) -> Option<&str> {
        self.fields.repo.as_deref()
    }
}

/// Merges every issue with the defaults, preserving order
pub fn merge_all(
    defaults: &DefaultsRecord,
    issues: &[IssueRecord],
    policy: RepoPolicy,
) -> Result<Vec<MergedItem>, MergeError> {
    issues
        .iter()
        .map(|issue| merge_issue(defaults, issue, policy))
        .collect()
}

/// Merges one issue with the defaults
pub fn merge_issue(
    defaults: &DefaultsRecord,
    issue: &IssueRecord,
    policy: RepoPolicy,
) -> Result<MergedItem, MergeError> {
    let fields = defaults.fields.overlaid_with(&issue.fields);

    let body = match (&issue.body, &issue.body_file) {
        (Some(_), Some(_)) => {
            return Err(MergeError::BodyConflict {
                path: issue.path(),
            })
        }
        (Some(text), None) => Some(BodySource::Inline(text.clone())),
        (None, Some(path)) => Some(BodySource::File(path.clone())),
        (None, None) => None,
    };

    if policy == RepoPolicy::Required && fields.repo.is_none() {
        return Err(MergeError::MissingRepo {
            path: issue.path(),
        });
    }

    Ok(MergedItem {
        index: issue.index,
        title: issue.title.clone(),
        body,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults_with_repo(repo: &str) -> DefaultsRecord {
        DefaultsRecord {
            fields: SharedFields {
                repo: Some(repo.to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn title_only_issue_inherits_defaults() {
        let defaults = DefaultsRecord {
            fields: SharedFields {
                repo: Some("org/repo".into()),
                assignees: Some(vec!["octocat".into()]),
                labels: Some(vec!["bug".into()]),
                milestone: Some("v1".into()),
                project: Some(vec!["Roadmap".into()]),
                template: Some("bug.md".into()),
            },
        };

        let merged = merge_issue(&defaults, &IssueRecord::new(0, "A"), RepoPolicy::Required).unwrap();
        assert_eq!(merged.fields, defaults.fields);
        assert_eq!(merged.title, "A");
        assert_eq!(merged.body, None);
    }

    #[test]
    fn issue_values_win() {
        let defaults = defaults_with_repo("org/repo");
        let mut issue = IssueRecord::new(1, "B");
        issue.fields.repo = Some("org/other".into());

        let merged = merge_issue(&defaults, &issue, RepoPolicy::Required).unwrap();
        assert_eq!(merged.repo(), Some("org/other"));
        assert_eq!(merged.index, 1);
    }

    #[test]
    fn body_and_body_file_conflict() {
        let mut issue = IssueRecord::new(3, "C");
        issue.body = Some("text".into());
        issue.body_file = Some("c.md".into());

        let err = merge_issue(&defaults_with_repo("org/repo"), &issue, RepoPolicy::Optional).unwrap_err();
        assert_eq!(err, MergeError::BodyConflict { path: "issues[3]".into() });
        assert_eq!(
            err.to_string(),
            "issues[3] has both body and body_file after defaults/issue merge"
        );
    }

    #[test]
    fn body_sources() {
        let defaults = DefaultsRecord::default();

        let mut inline = IssueRecord::new(0, "A");
        inline.body = Some(String::new());
        let merged = merge_issue(&defaults, &inline, RepoPolicy::Optional).unwrap();
        assert_eq!(merged.body, Some(BodySource::Inline(String::new())));

        let mut file = IssueRecord::new(1, "B");
        file.body_file = Some("b.md".into());
        let merged = merge_issue(&defaults, &file, RepoPolicy::Optional).unwrap();
        assert_eq!(merged.body, Some(BodySource::File("b.md".into())));
    }

    #[test]
    fn repo_required_only_when_applying() {
        let issues = vec![IssueRecord::new(0, "A"), IssueRecord::new(1, "B")];
        let defaults = DefaultsRecord::default();

        let merged = merge_all(&defaults, &issues, RepoPolicy::Optional).unwrap();
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|m| m.repo().is_none()));

        let err = merge_all(&defaults, &issues, RepoPolicy::Required).unwrap_err();
        assert_eq!(
            err.to_string(),
            "issues[0] missing repo (set defaults.repo or issues[0].repo)"
        );
    }

    #[test]
    fn order_is_preserved() {
        let issues: Vec<_> = ["A", "B", "C"]
            .iter()
            .enumerate()
            .map(|(i, t)| IssueRecord::new(i, *t))
            .collect();

        let merged = merge_all(&defaults_with_repo("org/repo"), &issues, RepoPolicy::Required).unwrap();
        let titles: Vec<_> = merged.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }
}
