//! issue-draft - Bulk GitHub issue creation from a TOML draft
//!
//! A draft holds shared `[defaults]` and a list of `[[issues]]`. The draft
//! is validated, each issue is merged with the defaults, and every merged
//! item becomes one `gh issue create` call. Failed items are reported and
//! the batch continues.

pub mod domain;
pub mod storage;
pub mod publish;
pub mod cli;

pub use domain::{BodySource, MergedItem, RepoPolicy};
