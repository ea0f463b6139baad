//! # Publishing
//!
//! Turns merged items into `gh issue create` invocations and runs them.
//!
//! ```text
//! MergedItem ──CommandBuilder──▶ ToolCommand ──IssueCreator──▶ ToolOutput
//!                                                   │
//!                                   Outcome (Created | Failed) ──▶ Tally
//! ```
//!
//! Items run one at a time in draft order. A failed item never stops the
//! batch; an interrupt does.
//!
//! ## Key Types
//!
//! - [`CommandBuilder`] - Deterministic argument construction
//! - [`IssueCreator`] - Seam for running the external tool
//! - [`ProcessCreator`] - Production implementation using child processes
//! - [`BatchObserver`] - Progress callbacks for console reporting

mod command;
mod confirm;
mod runner;

pub use command::{shell_quote, CommandBuilder, ToolCommand};
pub use confirm::confirm;
pub use runner::{
    execute, find_url, plan, BatchObserver, BatchReport, FailureReason, IssueCreator, Outcome,
    PlannedItem, ProcessCreator, Tally, ToolOutput,
};
