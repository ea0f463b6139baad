//! Validate-only mode (`--dry-run` / `--validate`)

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use super::app::RunStatus;
use super::output::Output;
use crate::domain::{MergedItem, RepoPolicy};
use crate::storage::load_draft;

/// Shown in place of a repo when validating without one
const NO_REPO: &str = "<repo required for apply>";

#[derive(Serialize)]
struct SummaryItem<'a> {
    index: usize,
    repo: Option<&'a str>,
    title: &'a str,
}

#[derive(Serialize)]
struct Summary<'a> {
    file: String,
    count: usize,
    issues: Vec<SummaryItem<'a>>,
}

pub fn run(output: &Output, file: &Path) -> Result<RunStatus> {
    let (draft, items) = load_draft(file, RepoPolicy::Optional)?;
    output.verbose_ctx("validate", &format!("{} issue(s) passed validation", items.len()));

    if output.is_json() {
        output.data(&Summary {
            file: draft.path().display().to_string(),
            count: items.len(),
            issues: items
                .iter()
                .enumerate()
                .map(|(i, item)| SummaryItem {
                    index: i + 1,
                    repo: item.repo(),
                    title: &item.title,
                })
                .collect(),
        });
    } else {
        for line in summary_lines(draft.path(), &items) {
            output.line(&line);
        }
    }

    Ok(RunStatus::Success)
}

/// Header plus one `N. [repo] title` line per item
fn summary_lines(path: &Path, items: &[MergedItem]) -> Vec<String> {
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(format!("Validated {}: {} issue(s)", path.display(), items.len()));

    for (i, item) in items.iter().enumerate() {
        lines.push(format!(
            "{}. [{}] {}",
            i + 1,
            item.repo().unwrap_or(NO_REPO),
            item.title
        ));
    }
    lines
}
