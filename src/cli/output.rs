use crate::checker::{scan, Lexicon};
use crate::script::escape::single_quoted;
use crate::script::ScriptSummary;
use crate::{Match, ScanError};
use colored::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// `<path>:<line>: <word> -> "<s1>","<s2>",...`
pub fn format_match(found: &Match, suggestions: &[String]) -> String {
    let candidates = suggestions
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{}:{}: {} -> {}",
        found.path.display(),
        found.line,
        found.word,
        candidates
    )
}

pub fn write_scan_errors<E: Write>(err: &mut E, errors: &[ScanError]) -> io::Result<()> {
    for error in errors {
        writeln!(err, "ERROR: {}", error)?;
    }
    Ok(())
}

/// Report every match on `out` and every scan error on `err`.
///
/// Output is flushed after each file. Returns true if anything was found.
pub fn report<L, O, E>(files: &[PathBuf], lexicon: &L, out: &mut O, err: &mut E) -> io::Result<bool>
where
    L: Lexicon + ?Sized,
    O: Write,
    E: Write,
{
    let mut found_any = false;

    for (_, result) in scan(files, lexicon) {
        write_scan_errors(err, &result.errors)?;
        for found in &result.matches {
            writeln!(out, "{}", format_match(found, &lexicon.suggestions(&found.word)))?;
            found_any = true;
        }
        out.flush()?;
    }

    Ok(found_any)
}

/// Write every match to `sink` in report format. Scan errors are dropped.
pub fn export<L, O>(files: &[PathBuf], lexicon: &L, sink: &mut O) -> io::Result<()>
where
    L: Lexicon + ?Sized,
    O: Write,
{
    for (path, result) in scan(files, lexicon) {
        if !result.errors.is_empty() {
            log::debug!("{}: not exported, {} errors", path.display(), result.errors.len());
        }
        for found in &result.matches {
            writeln!(sink, "{}", format_match(found, &lexicon.suggestions(&found.word)))?;
        }
    }

    sink.flush()
}

/// Print the whole table as `misspelling->correction` lines.
pub fn dump<L, O>(lexicon: &L, out: &mut O) -> io::Result<()>
where
    L: Lexicon + ?Sized,
    O: Write,
{
    for (word, correction) in lexicon.dump() {
        writeln!(out, "{}->{}", word, correction)?;
    }
    out.flush()
}

pub fn print_script_summary<E: Write>(
    err: &mut E,
    summary: &ScriptSummary,
    script: &Path,
    colored: bool,
) -> io::Result<()> {
    let fix_word = if summary.corrections == 1 {
        "correction"
    } else {
        "corrections"
    };
    let command = format!("sh {}", single_quoted(&script.to_string_lossy()));

    if summary.corrections == 0 {
        if colored {
            writeln!(err, "{}", "No corrections needed!".green().bold())
        } else {
            writeln!(err, "No corrections needed!")
        }
    } else if colored {
        writeln!(
            err,
            "{} {} {} written. Review, then run: {}",
            "✓".green().bold(),
            summary.corrections.to_string().green().bold(),
            fix_word,
            command.cyan()
        )
    } else {
        writeln!(
            err,
            "✓ {} {} written. Review, then run: {}",
            summary.corrections, fix_word, command
        )
    }
}
