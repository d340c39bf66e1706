//! Error types for the misspellings library.
//!
//! Per-file scan failures are not errors in this sense: they are collected
//! as [`ScanError`](crate::ScanError) values and the scan carries on. The
//! variants here abort the operation that raised them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors (script output, file lists, dictionary files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A plain-text dictionary line that is not `word->correction`
    #[error("{}:{line}: malformed misspelling entry: {content}", .path.display())]
    MalformedEntry {
        path: PathBuf,
        line: usize,
        content: String,
    },

    /// A JSON dictionary that does not deserialize
    #[error("{}: invalid JSON misspelling list: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A matched line that can no longer be read back from its file
    #[error("{}:{line}: cannot re-read matched line: {source}", .path.display())]
    StaleSource {
        path: PathBuf,
        line: usize,
        #[source]
        source: io::Error,
    },

    /// Failure building the lookup index
    #[error("failed to build dictionary index: {0}")]
    Index(#[from] fst::Error),

    /// An exclude pattern that is not a valid regex
    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The correction script target already exists
    #[error("refusing to overwrite existing script: {}", .0.display())]
    ScriptExists(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
