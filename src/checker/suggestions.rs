use super::source_line;
use crate::error::{Error, Result};
use crate::Match;
use colored::*;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};

/// Picks one replacement per match, asking the user when the dictionary
/// offers more than one.
///
/// The last answer given for each misspelled word becomes the default the
/// next time that word comes up. The cache lives as long as the resolver.
pub struct SuggestionResolver<R, W> {
    cache: HashMap<String, String>,
    input: R,
    output: W,
    colored: bool,
}

impl<R: BufRead, W: Write> SuggestionResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self::with_cache(HashMap::new(), input, output)
    }

    /// Start from previously chosen replacements.
    pub fn with_cache(cache: HashMap<String, String>, input: R, output: W) -> Self {
        Self {
            cache,
            input,
            output,
            colored: false,
        }
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn cache(&self) -> &HashMap<String, String> {
        &self.cache
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// The replacement to use for `found`.
    ///
    /// A single candidate is returned as is. Otherwise the source line is
    /// re-read from disk and shown with every candidate; an empty answer
    /// (or end of input) keeps the default shown. Fails with
    /// [`Error::StaleSource`] if the line can no longer be read, or
    /// [`Error::Io`] if the prompt cannot be written.
    pub fn resolve(&mut self, found: &Match, suggestions: &[String]) -> Result<String> {
        match suggestions {
            [] => return Ok(found.word.clone()),
            [only] => return Ok(only.clone()),
            _ => {}
        }

        let context =
            source_line(&found.path, found.line).map_err(|source| Error::StaleSource {
                path: found.path.clone(),
                line: found.line,
                source,
            })?;
        let default = self
            .cache
            .get(&found.word)
            .unwrap_or(&suggestions[0])
            .clone();

        self.print_prompt(found, &context, suggestions, &default)?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            // End of input accepts the default
            writeln!(self.output)?;
            return Ok(default);
        }

        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(default);
        }

        self.cache.insert(found.word.clone(), answer.to_string());
        Ok(answer.to_string())
    }

    fn print_prompt(
        &mut self,
        found: &Match,
        context: &str,
        suggestions: &[String],
        default: &str,
    ) -> io::Result<()> {
        let location = format!("{}:{}:", found.path.display(), found.line);
        let candidates = suggestions
            .iter()
            .map(|s| format!("\"{}\"", s))
            .collect::<Vec<_>>()
            .join(",");

        if self.colored {
            writeln!(
                self.output,
                "{} {}",
                location.blue().bold(),
                context.replacen(&found.word, &found.word.red().bold().to_string(), 1)
            )?;
            writeln!(
                self.output,
                "  {} {} {}",
                found.word.red().bold(),
                "->".dimmed(),
                candidates.green()
            )?;
            write!(
                self.output,
                "{} [{}]: ",
                "Enter suggestion".yellow().bold(),
                default.cyan()
            )?;
        } else {
            writeln!(self.output, "{} {}", location, context)?;
            writeln!(self.output, "  {} -> {}", found.word, candidates)?;
            write!(self.output, "Enter suggestion [{}]: ", default)?;
        }

        self.output.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    fn found(path: &Path, line: usize, word: &str) -> Match {
        Match {
            path: path.to_path_buf(),
            line,
            word: word.to_string(),
        }
    }

    fn candidates(all: &[&str]) -> Vec<String> {
        all.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_candidate_never_prompts() {
        let mut resolver = SuggestionResolver::new(Cursor::new("ignored\n"), Vec::new());
        let m = found(Path::new("does-not-exist.txt"), 3, "qick");

        let choice = resolver.resolve(&m, &candidates(&["quick"])).unwrap();
        assert_eq!(choice, "quick");

        let (mut input, output) = resolver.into_parts();
        assert!(output.is_empty());
        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "ignored\n");
    }

    #[test]
    fn test_prompt_shows_line_and_candidates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "x\nwich one\n").unwrap();

        let mut resolver = SuggestionResolver::new(Cursor::new("\n"), Vec::new());
        let choice = resolver
            .resolve(&found(&path, 2, "wich"), &candidates(&["which", "witch"]))
            .unwrap();
        assert_eq!(choice, "which");
        assert!(resolver.cache().is_empty());

        let (_, output) = resolver.into_parts();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains(":2: wich one\n"));
        assert!(output.contains("  wich -> \"which\",\"witch\"\n"));
        assert!(output.ends_with("Enter suggestion [which]: "));
    }

    #[test]
    fn test_choice_becomes_sticky_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "wich\nwich\nwich\n").unwrap();
        let options = candidates(&["which", "witch"]);

        let mut resolver = SuggestionResolver::new(Cursor::new("witch\n\n"), Vec::new());
        assert_eq!(resolver.resolve(&found(&path, 1, "wich"), &options).unwrap(), "witch");
        assert_eq!(resolver.cache().get("wich").map(String::as_str), Some("witch"));
        assert_eq!(resolver.resolve(&found(&path, 2, "wich"), &options).unwrap(), "witch");

        let (_, output) = resolver.into_parts();
        let output = String::from_utf8(output).unwrap();
        let defaults: Vec<_> = output.matches("Enter suggestion [").collect();
        assert_eq!(defaults.len(), 2);
        assert!(output.contains("Enter suggestion [which]: "));
        assert!(output.ends_with("Enter suggestion [witch]: "));
    }

    #[test]
    fn test_end_of_input_accepts_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "adress\n").unwrap();

        let mut cache = HashMap::new();
        cache.insert("adress".to_string(), "address".to_string());
        let mut resolver = SuggestionResolver::with_cache(cache, Cursor::new(""), Vec::new());

        let choice = resolver
            .resolve(&found(&path, 1, "adress"), &candidates(&["adders", "address"]))
            .unwrap();
        assert_eq!(choice, "address");
    }

    #[test]
    fn test_stale_line_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "only one line\n").unwrap();

        let mut resolver = SuggestionResolver::new(Cursor::new("\n"), Vec::new());
        let err = resolver
            .resolve(&found(&path, 5, "wich"), &candidates(&["which", "witch"]))
            .unwrap_err();
        assert!(matches!(err, Error::StaleSource { line: 5, .. }));
    }
}
