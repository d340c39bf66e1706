//! Correction-script generation.
//!
//! Nothing here touches the scanned files. The generated script rewrites
//! them when the user runs it, assuming each matched line number is still
//! where the match was found.

pub mod escape;

use crate::checker::suggestions::SuggestionResolver;
use crate::checker::{scan, Lexicon};
use crate::cli::output::write_scan_errors;
use crate::error::{Error, Result};
use crate::ScanError;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Corrections written to the script
    pub corrections: usize,
    /// Matches whose chosen replacement was the word itself
    pub unchanged: usize,
    /// Scan errors, unreadable matched lines, and paths a script cannot name
    pub errors: usize,
}

/// The `cp`/`sed`/`mv` block that replaces the first `word` on `line` of
/// `file`, newline-terminated.
pub fn correction_block(file: &str, line: usize, word: &str, replacement: &str) -> String {
    let file = escape::double_quoted(file);
    let pattern = escape::sed_pattern(word);
    let replacement = escape::sed_replacement(replacement);

    format!(
        "cp \"{file}\" \"{file},\"\n\
         sed \"{line}s/{pattern}/{replacement}/\" \"{file}\" > \"{file},\"\n\
         mv \"{file},\" \"{file}\"\n"
    )
}

/// Create the script file, refusing to replace one that already exists.
///
/// Call this before producing any other output so a refusal leaves
/// nothing behind.
pub fn create_script(script_path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(script_path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => Error::ScriptExists(script_path.to_path_buf()),
            _ => Error::Io(e),
        })?;
    log::info!("writing correction script to {}", script_path.display());
    Ok(file)
}

/// Resolve every match in `files` and write correction blocks to `script`.
///
/// Each block goes out in a single unbuffered `write_all`, so a script cut
/// short by an interrupt still ends on a block boundary.
pub fn write_script<L, R, W, S, E>(
    files: &[PathBuf],
    lexicon: &L,
    resolver: &mut SuggestionResolver<R, W>,
    script: &mut S,
    err: &mut E,
) -> Result<ScriptSummary>
where
    L: Lexicon + ?Sized,
    R: BufRead,
    W: Write,
    S: Write,
    E: Write,
{
    let mut summary = ScriptSummary::default();

    for (path, result) in scan(files, lexicon) {
        write_scan_errors(err, &result.errors)?;
        summary.errors += result.errors.len();

        let Some(file) = path.to_str() else {
            if !result.matches.is_empty() {
                let unnamed = ScanError {
                    path: path.to_path_buf(),
                    message: "path is not valid UTF-8, no corrections written".to_string(),
                };
                write_scan_errors(err, &[unnamed])?;
                summary.errors += 1;
            }
            continue;
        };

        for found in &result.matches {
            let suggestions = lexicon.suggestions(&found.word);
            let replacement = match resolver.resolve(found, &suggestions) {
                Ok(replacement) => replacement,
                Err(Error::StaleSource { path, source, .. }) => {
                    let stale = ScanError {
                        path,
                        message: source.to_string(),
                    };
                    write_scan_errors(err, &[stale])?;
                    summary.errors += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if replacement == found.word {
                summary.unchanged += 1;
                continue;
            }

            let block = correction_block(file, found.line, &found.word, &replacement);
            script.write_all(block.as_bytes())?;
            summary.corrections += 1;
        }
    }

    script.flush()?;
    Ok(summary)
}
