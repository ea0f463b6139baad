//! Main CLI application structure

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use thiserror::Error;

use super::output::{Output, OutputFormat};
use super::{apply_cmd, validate_cmd};
use crate::storage::{Config, DraftError};

#[derive(Parser, Debug)]
#[command(name = "issue-draft")]
#[command(author, version, about = "Validate a TOML draft of GitHub issues and create them with gh")]
pub struct Cli {
    /// Draft file to publish (asks for confirmation, then runs gh per issue)
    pub file: Option<PathBuf>,

    /// Validate only, do not call gh
    #[arg(long, value_name = "FILE")]
    pub dry_run: Option<PathBuf>,

    /// Validate only, do not call gh (alias of --dry-run)
    #[arg(long, value_name = "FILE")]
    pub validate: Option<PathBuf>,

    /// Program used to create issues
    #[arg(long = "gh", value_name = "PROGRAM", env = "ISSUE_DRAFT_GH")]
    pub gh: Option<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum UsageError {
    #[error("provide exactly one mode: <file> for apply, or --dry-run <file>, or --validate <file>")]
    ModeSelection,
}

/// What this invocation should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Confirm, then create every issue
    Apply(PathBuf),
    /// Validate and summarize; `selector` is the flag that chose it
    Validate { file: PathBuf, selector: &'static str },
}

impl Mode {
    /// Picks the mode from the three mutually exclusive selectors
    ///
    /// Empty paths count as not given.
    pub fn resolve(
        file: Option<PathBuf>,
        dry_run: Option<PathBuf>,
        validate: Option<PathBuf>,
    ) -> Result<Self, UsageError> {
        let given = |p: Option<PathBuf>| p.filter(|p| !p.as_os_str().is_empty());

        let selected: Vec<Mode> = [
            given(file).map(Mode::Apply),
            given(dry_run).map(|file| Mode::Validate { file, selector: "dry-run" }),
            given(validate).map(|file| Mode::Validate { file, selector: "validate" }),
        ]
        .into_iter()
        .flatten()
        .collect();

        match <[Mode; 1]>::try_from(selected) {
            Ok([mode]) => Ok(mode),
            Err(_) => Err(UsageError::ModeSelection),
        }
    }
}

/// How the process should exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failure,
    Interrupted,
}

impl RunStatus {
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failure => 1,
            RunStatus::Interrupted => 130,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<RunStatus> {
    let cli = Cli::parse();

    match dispatch(cli) {
        Err(e) if e.is::<DraftError>() || e.is::<UsageError>() => {
            eprintln!("Validation error: {}", e);
            Ok(RunStatus::Failure)
        }
        other => other,
    }
}

fn dispatch(cli: Cli) -> Result<RunStatus> {
    let mode = Mode::resolve(cli.file, cli.dry_run, cli.validate)?;

    // Validation never runs the tool, so a broken config only matters for apply
    let (config, config_error) = match (Config::load(), &mode) {
        (Ok(config), _) => (config, None),
        (Err(e), Mode::Validate { .. }) => (Config::default(), Some(e)),
        (Err(e), Mode::Apply(_)) => return Err(e),
    };
    let format = cli
        .format
        .or_else(|| config.default_format.map(OutputFormat::from))
        .unwrap_or_default();
    let output = Output::new(format, cli.verbose);

    if let Some(e) = config_error {
        output.verbose(&format!("Ignoring config: {:#}", e));
    }
    if let Some(source) = &config.source {
        output.verbose(&format!("Loaded config from {}", source.display()));
    }

    match mode {
        Mode::Validate { file, selector } => {
            output.verbose_ctx(selector, &format!("Validating {}", file.display()));
            validate_cmd::run(&output, &file)
        }
        Mode::Apply(file) => {
            let program = config.program(cli.gh.as_deref());
            output.verbose_ctx("apply", &format!("Applying {} with {}", file.display(), program));
            apply_cmd::run(&output, &file, program)
        }
    }
}
