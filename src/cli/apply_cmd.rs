//! Apply mode: confirm, then create each issue with gh

use std::io;
use std::path::Path;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use super::app::RunStatus;
use super::output::Output;
use crate::domain::RepoPolicy;
use crate::publish::{
    confirm, execute, plan, BatchObserver, CommandBuilder, FailureReason, Outcome, PlannedItem,
    ProcessCreator, Tally,
};
use crate::storage::load_draft;

pub fn run(output: &Output, file: &Path, program: &str) -> Result<RunStatus> {
    let (draft, items) = load_draft(file, RepoPolicy::Required)?;

    let builder = CommandBuilder::new(program, draft.dir());
    let planned = plan(items, &builder);

    let interrupt = Arc::new(AtomicBool::new(false));
    let prompting = Arc::new(AtomicBool::new(true));
    install_interrupt_handler(Arc::clone(&interrupt), Arc::clone(&prompting))?;

    let titles: Vec<&str> = planned.iter().map(|p| p.item.title.as_str()).collect();
    let accepted = confirm(&titles, &mut io::stdin().lock(), &mut io::stdout())
        .context("Failed to read confirmation")?;
    prompting.store(false, Ordering::SeqCst);
    if interrupt.load(Ordering::SeqCst) {
        eprintln!("Interrupted.");
        return Ok(RunStatus::Interrupted);
    }
    if !accepted {
        println!("Aborted.");
        return Ok(RunStatus::Failure);
    }

    let mut reporter = ConsoleReporter { output };
    let report = execute(&planned, &mut ProcessCreator, &mut reporter, &interrupt);

    if report.interrupted {
        output.verbose_ctx(
            "apply",
            &format!(
                "Stopped after {} of {} issue(s)",
                report.outcomes.len(),
                planned.len()
            ),
        );
        eprintln!("Interrupted.");
        return Ok(RunStatus::Interrupted);
    }

    print_tally(output, &report.tally);

    Ok(if report.tally.is_clean() {
        RunStatus::Success
    } else {
        RunStatus::Failure
    })
}

/// Raises `interrupt` on Ctrl-C
///
/// While the confirmation prompt is blocked on stdin there is no batch to
/// stop, so the process exits right away instead.
fn install_interrupt_handler(interrupt: Arc<AtomicBool>, prompting: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || {
        interrupt.store(true, Ordering::SeqCst);
        if prompting.load(Ordering::SeqCst) {
            eprintln!("Interrupted.");
            process::exit(RunStatus::Interrupted.code().into());
        }
    })
    .context("Failed to install Ctrl-C handler")
}

fn print_tally(output: &Output, tally: &Tally) {
    if output.is_json() {
        output.data(&serde_json::json!({
            "created": tally.created,
            "failed": tally.failed,
        }));
    } else {
        println!("created {}, failed {}", tally.created, tally.failed);
    }
}

/// Prints URLs and failure blocks as items finish
struct ConsoleReporter<'a> {
    output: &'a Output,
}

impl BatchObserver for ConsoleReporter<'_> {
    fn starting(&mut self, position: usize, planned: &PlannedItem) {
        if self.output.is_verbose() {
            self.output
                .verbose_ctx("apply", &format!("Issue {}: {}", position, planned.command));
        }
    }

    fn finished(&mut self, position: usize, planned: &PlannedItem, outcome: &Outcome) {
        match outcome {
            Outcome::Created { url } => println!("{}", url),
            Outcome::Failed { .. } => print!("{}", failure_block(position, planned, outcome)),
        }
    }
}

/// Diagnostic text for a failed item, one field per line
fn failure_block(position: usize, planned: &PlannedItem, outcome: &Outcome) -> String {
    let Outcome::Failed {
        reason,
        stdout,
        stderr,
    } = outcome
    else {
        return String::new();
    };

    let mut lines = Vec::new();
    lines.push(match reason {
        FailureReason::NoUrl => format!(
            "Issue {} failed (unable to parse URL from tool output):",
            position
        ),
        FailureReason::ExitStatus(_) => format!("Issue {} failed:", position),
        FailureReason::Spawn(message) => format!("Issue {} failed ({}):", position, message),
    });
    lines.push(format!("  title: {}", planned.item.title));
    lines.push(format!("  repo:  {}", planned.item.repo().unwrap_or_default()));
    lines.push(format!("  cmd:   {}", planned.command));

    match reason {
        FailureReason::ExitStatus(Some(code)) => lines.push(format!("  exit:  {}", code)),
        FailureReason::ExitStatus(None) => lines.push("  exit:  terminated by signal".to_string()),
        _ => {}
    }

    for (name, text) in [("stdout", stdout), ("stderr", stderr)] {
        if !text.trim().is_empty() {
            lines.push(format!("  {}:", name));
            lines.push(text.trim_end().to_string());
        }
    }

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MergedItem, SharedFields};

    fn planned_item() -> PlannedItem {
        let item = MergedItem {
            index: 1,
            title: "Broken thing".into(),
            body: None,
            fields: SharedFields {
                repo: Some("org/repo".into()),
                ..Default::default()
            },
        };
        let command = CommandBuilder::new("gh", "/drafts").build(&item);
        PlannedItem { item, command }
    }

    #[test]
    fn failure_block_for_exit_status() {
        let outcome = Outcome::Failed {
            reason: FailureReason::ExitStatus(Some(1)),
            stdout: String::new(),
            stderr: "GraphQL: Could not resolve to a Repository\n".into(),
        };

        assert_eq!(
            failure_block(2, &planned_item(), &outcome),
            "Issue 2 failed:\n\
             \x20 title: Broken thing\n\
             \x20 repo:  org/repo\n\
             \x20 cmd:   gh issue create --repo org/repo --title 'Broken thing' --body ''\n\
             \x20 exit:  1\n\
             \x20 stderr:\n\
             GraphQL: Could not resolve to a Repository\n"
        );
    }

    #[test]
    fn failure_block_for_missing_url() {
        let outcome = Outcome::Failed {
            reason: FailureReason::NoUrl,
            stdout: "created?\n".into(),
            stderr: "  \n".into(),
        };

        let block = failure_block(1, &planned_item(), &outcome);
        assert!(block.starts_with("Issue 1 failed (unable to parse URL from tool output):\n"));
        assert!(block.contains("  stdout:\ncreated?\n"));
        assert!(!block.contains("stderr"));
    }

    #[test]
    fn created_outcome_has_no_block() {
        let outcome = Outcome::Created {
            url: "https://x/1".into(),
        };
        assert_eq!(failure_block(1, &planned_item(), &outcome), "");
    }
}
