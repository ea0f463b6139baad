//! Structural validation of draft documents
//!
//! Validation runs table by table: the top level, then `[defaults]`, then
//! each `[[issues]]` entry in order. The first table with a problem stops
//! the walk.
//!
//! Inside a table there are two passes. The unknown-key pass reports every
//! unrecognised key in one violation and rejects the table outright. The
//! field pass then checks each known key on its own and collects all
//! violations before failing, so one run shows every bad field of the
//! offending table.

use std::fmt;

use thiserror::Error;
use toml::{Table, Value};

use super::draft::{
    issue_path, DefaultsRecord, IssueRecord, SharedFields, ValidatedDraft, DEFAULT_KEYS, ISSUE_KEYS,
    TOP_LEVEL_KEYS,
};

/// A single path-qualified problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Location such as `issues[2].labels[0]`; empty for the document itself
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("TOML parse error: {0}")]
    Parse(String),

    #[error("{}", join_lines(.0))]
    Invalid(Vec<Violation>),
}

impl SchemaError {
    fn at(path: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::Invalid(vec![Violation::new(path, message)])
    }
}

fn join_lines(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses and validates draft text
pub fn validate_document(text: &str) -> Result<ValidatedDraft, SchemaError> {
    let root: Table = toml::from_str(text).map_err(|e: toml::de::Error| {
        // Keep the parser's message on one line, without source excerpts
        let message: Vec<&str> = e.message().lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        SchemaError::Parse(message.join(" "))
    })?;
    validate_root(&root)
}

/// Validates an already-parsed draft
pub fn validate_root(root: &Table) -> Result<ValidatedDraft, SchemaError> {
    check_unknown_keys(root, TOP_LEVEL_KEYS, "")?;

    let defaults = match root.get("defaults") {
        Some(value) => validate_defaults(value)?,
        None => DefaultsRecord::default(),
    };

    let items = match root.get("issues") {
        None => return Err(SchemaError::at("", "missing required [[issues]] entries")),
        Some(Value::Array(items)) if !items.is_empty() => items,
        Some(_) => {
            return Err(SchemaError::at(
                "",
                "issues must be a non-empty array of tables",
            ))
        }
    };

    let issues = items
        .iter()
        .enumerate()
        .map(|(index, value)| validate_issue(value, index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedDraft { defaults, issues })
}

fn validate_defaults(value: &Value) -> Result<DefaultsRecord, SchemaError> {
    let table = value
        .as_table()
        .ok_or_else(|| SchemaError::at("defaults", "must be a table"))?;

    check_unknown_keys(table, DEFAULT_KEYS, "defaults")?;

    let collected = FieldPass::run(table, "defaults")?;
    Ok(DefaultsRecord {
        fields: collected.shared,
    })
}

fn validate_issue(value: &Value, index: usize) -> Result<IssueRecord, SchemaError> {
    let path = issue_path(index);
    let table = value
        .as_table()
        .ok_or_else(|| SchemaError::at(&path, "must be a table"))?;

    check_unknown_keys(table, ISSUE_KEYS, &path)?;

    if !table.contains_key("title") {
        return Err(SchemaError::at(&path, "missing required key: title"));
    }

    let collected = FieldPass::run(table, &path)?;
    Ok(IssueRecord {
        index,
        title: collected.title.unwrap_or_default(),
        body: collected.body,
        body_file: collected.body_file,
        fields: collected.shared,
    })
}

fn check_unknown_keys(table: &Table, allowed: &[&str], path: &str) -> Result<(), SchemaError> {
    let mut unknown: Vec<&str> = table
        .keys()
        .map(String::as_str)
        .filter(|key| !allowed.contains(key))
        .collect();

    if unknown.is_empty() {
        return Ok(());
    }

    unknown.sort_unstable();
    Err(SchemaError::at(
        path,
        format!("contains unknown keys: {}", unknown.join(", ")),
    ))
}

/// Values gathered by the field pass
#[derive(Default)]
struct Collected {
    title: Option<String>,
    body: Option<String>,
    body_file: Option<String>,
    shared: SharedFields,
}

/// Per-field checks for one table, collecting every violation
#[derive(Default)]
struct FieldPass {
    violations: Vec<Violation>,
}

impl FieldPass {
    /// Checks every key of a table whose keys are already known to be allowed
    fn run(table: &Table, prefix: &str) -> Result<Collected, SchemaError> {
        let mut pass = FieldPass::default();
        let mut out = Collected::default();

        for (key, value) in table {
            let path = format!("{}.{}", prefix, key);
            match key.as_str() {
                "title" => out.title = pass.non_empty_string(value, &path),
                "body" => out.body = pass.string(value, &path),
                "body_file" => out.body_file = pass.non_empty_string(value, &path),
                "repo" => out.shared.repo = pass.non_empty_string(value, &path),
                "milestone" => out.shared.milestone = pass.non_empty_string(value, &path),
                "template" => out.shared.template = pass.non_empty_string(value, &path),
                "assignees" => out.shared.assignees = pass.string_list(value, &path),
                "labels" => out.shared.labels = pass.string_list(value, &path),
                "project" => out.shared.project = pass.project(value, &path),
                _ => {}
            }
        }

        if pass.violations.is_empty() {
            Ok(out)
        } else {
            Err(SchemaError::Invalid(pass.violations))
        }
    }

    fn fail<T>(&mut self, path: &str, message: &str) -> Option<T> {
        self.violations.push(Violation::new(path, message));
        None
    }

    fn string(&mut self, value: &Value, path: &str) -> Option<String> {
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => self.fail(path, "must be a string"),
        }
    }

    fn non_empty_string(&mut self, value: &Value, path: &str) -> Option<String> {
        match value.as_str() {
            Some(s) if s.trim().is_empty() => self.fail(path, "must be a non-empty string"),
            Some(s) => Some(s.to_string()),
            None => self.fail(path, "must be a string"),
        }
    }

    fn string_list(&mut self, value: &Value, path: &str) -> Option<Vec<String>> {
        let Some(items) = value.as_array() else {
            return self.fail(path, "must be an array of strings");
        };

        let mut result = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) => result.push(s.to_string()),
                // Stop at the first bad element of this array
                None => return self.fail(&format!("{}[{}]", path, i), "must be a string"),
            }
        }
        Some(result)
    }

    fn project(&mut self, value: &Value, path: &str) -> Option<Vec<String>> {
        match value {
            Value::String(s) => Some(vec![s.clone()]),
            other => self.string_list(other, path),
        }
    }
}
