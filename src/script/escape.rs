//! Quoting for text embedded in generated shell commands.
//!
//! Substitution tokens pass through two interpreters: the shell (inside a
//! double-quoted argument) and then sed. Each character is escaped for
//! whichever of the two would otherwise give it meaning.

/// Escape `raw` for use inside a double-quoted shell argument.
pub fn double_quoted(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Quote `raw` as a single-quoted shell word.
///
/// An embedded `'` closes the quoted string, adds an escaped quote, and
/// reopens it.
pub fn single_quoted(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

/// Escape the word to find for `sed "Ns/<pattern>/.../"`.
pub fn sed_pattern(word: &str) -> String {
    sed_token(word, |ch| matches!(ch, '.' | '*' | '[' | ']' | '^' | '$'))
}

/// Escape the replacement for `sed "Ns/.../<replacement>/"`.
pub fn sed_replacement(word: &str) -> String {
    sed_token(word, |ch| ch == '&')
}

fn sed_token(raw: &str, special: impl Fn(char) -> bool) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            // The shell keeps `\/` and `\"` becomes `"`
            '/' | '"' | '`' => escaped.push('\\'),
            // Escaped for sed, then both characters escaped for the shell
            '\\' => escaped.push_str(r"\\\"),
            '$' if special(ch) => escaped.push_str(r"\\\"),
            '$' => escaped.push('\\'),
            _ if special(ch) => escaped.push('\\'),
            _ => {}
        }
        escaped.push(ch);
    }
    escaped
}
