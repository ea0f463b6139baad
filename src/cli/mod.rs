//! # Command-Line Interface
//!
//! Exactly one mode selector per invocation:
//!
//! | Invocation | Mode | Needs `repo` | Calls gh |
//! |------------|------|--------------|----------|
//! | `issue-draft <file>` | apply (asks first) | yes | yes |
//! | `issue-draft --dry-run <file>` | validate | no | no |
//! | `issue-draft --validate <file>` | validate | no | no |
//!
//! ## Exit Status
//!
//! - `0` - validated, or every issue created
//! - `1` - validation error, declined confirmation, or any failed issue
//! - `130` - interrupted during the batch
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! issue-draft --verbose --dry-run drafts/q3.toml
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the selected mode.

mod app;
mod apply_cmd;
mod output;
mod validate_cmd;

pub use app::{run, Cli, Mode, RunStatus, UsageError};
pub use output::{Output, OutputFormat};
