use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Runs of word characters and apostrophes
    static ref WORD: Regex = Regex::new(r"[\w']+").unwrap();
}

/// Split a line into candidate words, left to right.
///
/// Apostrophes inside a word are kept (`don't`), surrounding ones are
/// trimmed (`'teh'` yields `teh`).
pub fn split_words(line: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(line)
        .map(|m| m.as_str().trim_matches('\''))
        .filter(|word| !word.is_empty())
}

/// Re-case `destination` to follow the capitalization of `source`.
///
/// `Teh` -> `The`, `TEH` -> `THE`, anything else is returned unchanged.
pub fn same_case(source: &str, destination: &str) -> String {
    let mut chars = source.chars();
    let first_upper = chars.next().is_some_and(char::is_uppercase);
    if !first_upper {
        return destination.to_string();
    }

    let second_upper = chars.next().is_some_and(char::is_uppercase);
    if second_upper {
        destination.to_uppercase()
    } else {
        capitalize(destination)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
