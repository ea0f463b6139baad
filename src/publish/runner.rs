//! Sequential execution of planned commands
//!
//! Every item runs, in draft order, even after earlier failures. The only
//! early exit is an interrupt, checked before each item and after each
//! tool invocation returns.

use std::io;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::LazyLock;

use regex::Regex;

use super::command::{CommandBuilder, ToolCommand};
use crate::domain::MergedItem;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("static regex must compile"));

/// Captured result of one tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs the external creation tool
pub trait IssueCreator {
    fn create(&mut self, command: &ToolCommand) -> io::Result<ToolOutput>;
}

/// Spawns the tool as a child process and waits for it
#[derive(Debug, Default)]
pub struct ProcessCreator;

impl IssueCreator for ProcessCreator {
    fn create(&mut self, command: &ToolCommand) -> io::Result<ToolOutput> {
        let output = Command::new(&command.program).args(&command.args).output()?;

        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Why an item was not created
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Exit status zero but nothing URL-shaped in the output
    NoUrl,
    /// Non-zero exit; `None` when terminated by a signal
    ExitStatus(Option<i32>),
    /// The tool could not be started at all
    Spawn(String),
}

/// Result for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created {
        url: String,
    },
    Failed {
        reason: FailureReason,
        stdout: String,
        stderr: String,
    },
}

impl Outcome {
    /// Classifies captured tool output
    pub fn from_output(output: &ToolOutput) -> Self {
        if !output.success {
            return Outcome::Failed {
                reason: FailureReason::ExitStatus(output.code),
                stdout: output.stdout.clone(),
                stderr: output.stderr.clone(),
            };
        }

        match find_url(&output.stdout, &output.stderr) {
            Some(url) => Outcome::Created {
                url: url.to_string(),
            },
            None => Outcome::Failed {
                reason: FailureReason::NoUrl,
                stdout: output.stdout.clone(),
                stderr: output.stderr.clone(),
            },
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Outcome::Created { .. })
    }
}

/// First URL in stdout, falling back to stderr
pub fn find_url<'a>(stdout: &'a str, stderr: &'a str) -> Option<&'a str> {
    [stdout, stderr]
        .into_iter()
        .find_map(|stream| URL_RE.find(stream).map(|m| m.as_str()))
}

/// Running created/failed counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub created: usize,
    pub failed: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: &Outcome) {
        if outcome.is_created() {
            self.created += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// A merged item paired with the command that creates it
#[derive(Debug, Clone)]
pub struct PlannedItem {
    pub item: MergedItem,
    pub command: ToolCommand,
}

/// Builds the command for every item, keeping draft order
pub fn plan(items: Vec<MergedItem>, builder: &CommandBuilder) -> Vec<PlannedItem> {
    items
        .into_iter()
        .map(|item| {
            let command = builder.build(&item);
            PlannedItem { item, command }
        })
        .collect()
}

/// Receives progress events from [`execute`]
pub trait BatchObserver {
    /// Called just before the tool is invoked; `position` is one-based
    fn starting(&mut self, _position: usize, _planned: &PlannedItem) {}

    /// Called once the outcome of an item is known
    fn finished(&mut self, position: usize, planned: &PlannedItem, outcome: &Outcome);
}

/// Result of a whole batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub tally: Tally,
    /// One entry per completed item, in draft order
    pub outcomes: Vec<Outcome>,
    pub interrupted: bool,
}

/// Runs every planned item in order
pub fn execute<C, O>(
    planned: &[PlannedItem],
    creator: &mut C,
    observer: &mut O,
    interrupt: &AtomicBool,
) -> BatchReport
where
    C: IssueCreator + ?Sized,
    O: BatchObserver + ?Sized,
{
    let mut report = BatchReport::default();

    for (i, entry) in planned.iter().enumerate() {
        if interrupt.load(Ordering::SeqCst) {
            report.interrupted = true;
            break;
        }

        let position = i + 1;
        observer.starting(position, entry);

        let outcome = match creator.create(&entry.command) {
            Ok(output) => Outcome::from_output(&output),
            Err(e) => Outcome::Failed {
                reason: FailureReason::Spawn(format!(
                    "failed to run {}: {}",
                    entry.command.program, e
                )),
                stdout: String::new(),
                stderr: String::new(),
            },
        };

        // The in-flight item saw the same Ctrl-C; drop its result
        if interrupt.load(Ordering::SeqCst) {
            report.interrupted = true;
            break;
        }

        report.tally.record(&outcome);
        observer.finished(position, entry, &outcome);
        report.outcomes.push(outcome);
    }

    report
}
