pub mod dictionary;
pub mod suggestions;
pub mod tokenizer;

use crate::FileScan;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lookup capability the scanning pipeline depends on.
///
/// [`dictionary::Dictionary`] is the shipped implementation; anything that
/// can locate misspellings in a file and propose corrections can stand in.
pub trait Lexicon {
    /// Locate every known misspelling in `path`, in line order.
    ///
    /// Failures to read the file are returned in [`FileScan::errors`],
    /// never raised.
    fn check(&self, path: &Path) -> FileScan;

    /// Candidate corrections for `word`. Non-empty for any word `check`
    /// reported; the first entry is the default.
    fn suggestions(&self, word: &str) -> Vec<String>;

    /// Every `(misspelling, correction)` pair in the table.
    fn dump(&self) -> Vec<(String, String)>;
}

/// Scan `files` in the given order, one file at a time.
///
/// Each file is read independently when the iterator reaches it, so a bad
/// file only contributes errors to its own [`FileScan`].
pub fn scan<'a, L>(
    files: &'a [PathBuf],
    lexicon: &'a L,
) -> impl Iterator<Item = (&'a Path, FileScan)> + 'a
where
    L: Lexicon + ?Sized,
{
    files.iter().map(move |path| {
        let result = lexicon.check(path);
        log::debug!(
            "{}: {} matches, {} errors",
            path.display(),
            result.matches.len(),
            result.errors.len()
        );
        (path.as_path(), result)
    })
}

/// Re-read line `line` (1-based) of `path` as it currently is on disk.
pub fn source_line(path: &Path, line: usize) -> io::Result<String> {
    let content = fs::read_to_string(path)?;
    line.checked_sub(1)
        .and_then(|idx| content.lines().nth(idx))
        .map(str::to_string)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} has no line {}", path.display(), line),
            )
        })
}
