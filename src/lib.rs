pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod script;
pub mod walk;

pub use checker::dictionary::{Dictionary, DictionarySource};
pub use checker::suggestions::SuggestionResolver;
pub use checker::Lexicon;
pub use config::Config;
pub use error::{Error, Result};

use std::fmt;
use std::path::PathBuf;

/// A dictionary word found on a specific line of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// The token exactly as it appears in the file.
    pub word: String,
}

/// A per-file failure collected during a scan. Never aborts the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Result of checking one file.
#[derive(Debug, Clone, Default)]
pub struct FileScan {
    pub errors: Vec<ScanError>,
    pub matches: Vec<Match>,
}
