//! Errors raised while accepting host input.
//!
//! Selection, comparison, deletion and restore never fail: lookups that
//! miss are no-ops. Only revisions handed in by the host are validated.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RevisionError {
    #[error("Revision already exists: {0}")]
    DuplicateId(String),

    #[error("Revision version {version} must be greater than {highest}")]
    VersionNotIncreasing { version: u64, highest: u64 },

    #[error("Unsupported metadata value for key '{0}': only strings, numbers and booleans are allowed")]
    UnsupportedMetadata(String),
}
