//! Draft model, validation and merge
//!
//! Pure logic with no I/O: text in, merged items out.

mod draft;
mod merge;
mod schema;

pub use draft::{DefaultsRecord, IssueRecord, SharedFields, ValidatedDraft};
pub use merge::{merge_all, merge_issue, BodySource, MergeError, MergedItem, RepoPolicy};
pub use schema::{validate_document, validate_root, SchemaError, Violation};
