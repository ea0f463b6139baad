//! issue-draft - Create GitHub issues in bulk from a TOML draft

use std::process::ExitCode;

fn main() -> ExitCode {
    match issue_draft::cli::run() {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
