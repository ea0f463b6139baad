//! # Storage Layer
//!
//! Everything that touches the filesystem.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Draft | TOML (`[defaults]` + `[[issues]]`) | path given on the command line |
//! | Config | TOML | `$ISSUE_DRAFT_CONFIG` or `~/.config/issue-draft/config.toml` |
//!
//! ## Key Types
//!
//! - [`DraftFile`] - A draft read from disk, with its directory for resolving `body_file`
//! - [`Config`] - User configuration (tool program, default output format)

mod config;
mod draft_file;

pub use config::{Config, ConfigError, FormatPreference, ToolConfig, CONFIG_ENV, DEFAULT_PROGRAM};
pub use draft_file::{load_draft, DraftError, DraftFile, DraftFileError};
