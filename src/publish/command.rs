//! Argument lists for `gh issue create`
//!
//! Flag order is fixed so the same item always yields the same command:
//!
//! ```text
//! gh issue create --repo R --title T
//!    [--body B | --body-file P]
//!    [--assignee A]... [--label L]... [--milestone M]
//!    [--project P]... [--template T]
//! ```

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::{BodySource, MergedItem};

/// A fully resolved invocation of the external tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    /// Program followed by its arguments
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.tokens().map(shell_quote).collect();
        write!(f, "{}", quoted.join(" "))
    }
}

/// Quotes a token for a POSIX shell
pub fn shell_quote(token: &str) -> String {
    let safe = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c));

    if safe {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', "'\"'\"'"))
    }
}

/// Turns merged items into tool commands
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
    draft_dir: PathBuf,
}

impl CommandBuilder {
    /// `draft_dir` is the directory holding the draft; relative
    /// `body_file` paths are resolved against it.
    pub fn new(program: impl Into<String>, draft_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            draft_dir: draft_dir.into(),
        }
    }

    pub fn build(&self, item: &MergedItem) -> ToolCommand {
        let fields = &item.fields;
        let mut args: Vec<String> = vec!["issue".into(), "create".into()];

        if let Some(repo) = &fields.repo {
            push_pair(&mut args, "--repo", repo);
        }
        push_pair(&mut args, "--title", &item.title);

        match &item.body {
            Some(BodySource::Inline(text)) => push_pair(&mut args, "--body", text),
            Some(BodySource::File(path)) => {
                let resolved = self.resolve_body_file(path);
                push_pair(&mut args, "--body-file", &resolved.to_string_lossy());
            }
            // Keep gh from opening an editor when nothing else supplies a body
            None if fields.template.is_none() => push_pair(&mut args, "--body", ""),
            None => {}
        }

        for assignee in fields.assignees.iter().flatten() {
            push_pair(&mut args, "--assignee", assignee);
        }
        for label in fields.labels.iter().flatten() {
            push_pair(&mut args, "--label", label);
        }
        if let Some(milestone) = &fields.milestone {
            push_pair(&mut args, "--milestone", milestone);
        }
        for project in fields.project.iter().flatten() {
            push_pair(&mut args, "--project", project);
        }
        if let Some(template) = &fields.template {
            push_pair(&mut args, "--template", template);
        }

        ToolCommand {
            program: self.program.clone(),
            args,
        }
    }

    fn resolve_body_file(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            normalize(&self.draft_dir.join(path))
        }
    }
}

/// Drops `.` and folds `..` into its parent without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

fn push_pair(args: &mut Vec<String>, flag: &str, value: &str) {
    args.push(flag.to_string());
    args.push(value.to_string());
}
