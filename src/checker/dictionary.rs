use super::tokenizer::{same_case, split_words};
use super::Lexicon;
use crate::error::{Error, Result};
use crate::{FileScan, Match, ScanError};
use flate2::read::GzDecoder;
use fst::{Map, Streamer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Misspelling list compiled into the binary.
const BUNDLED_LIST: &str = include_str!("../../data/misspellings.json");

/// Where the misspelling list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    Bundled,
    /// `misspelling->correction[, correction...]` per line
    Text(PathBuf),
    Json(PathBuf),
}

/// JSON layouts accepted for a misspelling list.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonList {
    Table(BTreeMap<String, OneOrMany>),
    Pairs(Vec<(String, String)>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Table of commonly misspelled words and their corrections.
///
/// Misspellings are indexed by an FST map whose values are slots in
/// `corrections`, so lookups never allocate and `dump` streams keys in
/// byte order.
pub struct Dictionary {
    index: Map<Vec<u8>>,
    corrections: Vec<Vec<String>>,
}

impl Dictionary {
    pub fn load(source: &DictionarySource) -> Result<Self> {
        match source {
            DictionarySource::Bundled => {
                Self::from_json_str(BUNDLED_LIST, Path::new("<bundled>"))
            }
            DictionarySource::Text(path) => {
                let content = read_source(path)?;
                Self::from_entries(parse_text(path, &content)?)
            }
            DictionarySource::Json(path) => {
                let content = read_source(path)?;
                Self::from_json_str(&content, path)
            }
        }
    }

    /// Build from `(misspelling, correction)` pairs. Corrections for the
    /// same misspelling accumulate in order; repeats are dropped.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (word, correction) in entries {
            let slot = table.entry(word.into()).or_default();
            let correction = correction.into();
            if !slot.contains(&correction) {
                slot.push(correction);
            }
        }

        let index = Map::from_iter(
            table
                .keys()
                .enumerate()
                .map(|(slot, word)| (word.as_bytes(), slot as u64)),
        )?;
        let corrections = table.into_values().collect();

        Ok(Self { index, corrections })
    }

    fn from_json_str(content: &str, path: &Path) -> Result<Self> {
        let list: JsonList =
            serde_json::from_str(content).map_err(|source| Error::InvalidJson {
                path: path.to_path_buf(),
                source,
            })?;

        let mut entries = Vec::new();
        match list {
            JsonList::Table(table) => {
                for (word, corrections) in table {
                    match corrections {
                        OneOrMany::One(correction) => entries.push((word, correction)),
                        OneOrMany::Many(all) => {
                            entries.extend(all.into_iter().map(|c| (word.clone(), c)))
                        }
                    }
                }
            }
            JsonList::Pairs(pairs) => entries = pairs,
        }

        Self::from_entries(entries)
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    /// Check if the token, or its lowercase form, is a known misspelling
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word) || self.index.contains_key(word.to_lowercase())
    }

    fn corrections_for(&self, word: &str) -> &[String] {
        match self.index.get(word) {
            Some(slot) => &self.corrections[slot as usize],
            None => &[],
        }
    }
}

impl Lexicon for Dictionary {
    fn check(&self, path: &Path) -> FileScan {
        let mut scan = FileScan::default();

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                scan.errors.push(ScanError {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
                return scan;
            }
        };
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                scan.errors.push(ScanError {
                    path: path.to_path_buf(),
                    message: format!("not valid UTF-8: {}", e.utf8_error()),
                });
                return scan;
            }
        };

        for (line_num, line) in content.lines().enumerate() {
            for word in split_words(line) {
                if self.contains(word) {
                    scan.matches.push(Match {
                        path: path.to_path_buf(),
                        line: line_num + 1,
                        word: word.to_string(),
                    });
                }
            }
        }

        scan
    }

    fn suggestions(&self, word: &str) -> Vec<String> {
        let lower = word.to_lowercase();
        let mut suggestions: Vec<String> = Vec::new();

        let exact = self.corrections_for(word);
        let folded: &[String] = if lower != word {
            self.corrections_for(&lower)
        } else {
            &[]
        };

        for correction in exact.iter().chain(folded) {
            let suggestion = same_case(word, correction);
            if !suggestions.contains(&suggestion) {
                suggestions.push(suggestion);
            }
        }

        suggestions
    }

    fn dump(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut stream = self.index.stream();

        while let Some((key, slot)) = stream.next() {
            let word = String::from_utf8_lossy(key).into_owned();
            for correction in &self.corrections[slot as usize] {
                pairs.push((word.clone(), correction.clone()));
            }
        }

        pairs
    }
}

/// Parse a plain-text misspelling list.
fn parse_text(path: &Path, content: &str) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = || Error::MalformedEntry {
            path: path.to_path_buf(),
            line: line_num + 1,
            content: line.to_string(),
        };

        let (word, corrections) = line.split_once("->").ok_or_else(malformed)?;
        let word = word.trim();
        let before = entries.len();
        for correction in corrections.split(',').map(str::trim) {
            if !correction.is_empty() && !word.is_empty() {
                entries.push((word.to_string(), correction.to_string()));
            }
        }
        if entries.len() == before {
            return Err(malformed());
        }
    }

    Ok(entries)
}

/// Read a dictionary file, gunzipping it when the name ends in `.gz`.
fn read_source(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut content = String::new();

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        GzDecoder::new(file).read_to_string(&mut content)?;
    } else {
        file.read_to_string(&mut content)?;
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::tempdir;

    fn sample() -> Dictionary {
        Dictionary::from_entries([
            ("qick", "quick"),
            ("teh", "the"),
            ("recieve", "receive"),
            ("accomodate", "accommodate"),
            ("accomodate", "accommodates"),
        ])
        .unwrap()
    }

    #[test]
    fn test_bundled_list_loads() {
        let dict = Dictionary::load(&DictionarySource::Bundled).unwrap();
        assert!(!dict.is_empty());
        assert!(dict.contains("recieve"));
        assert_eq!(dict.suggestions("recieve"), vec!["receive"]);
    }

    #[test]
    fn test_bundled_list_coverage() {
        let dict = Dictionary::load(&DictionarySource::Bundled).unwrap();
        assert!(dict.len() > 800);
        for word in ["seperate", "definately", "occurence", "enviroment", "paramters", "wether"] {
            assert!(dict.contains(word), "{} missing", word);
        }

        // no correction is itself flagged
        for (_, correction) in dict.dump() {
            assert!(!dict.contains(&correction), "{} is flagged", correction);
        }
    }

    #[test]
    fn test_contains_folds_case() {
        let dict = sample();
        assert!(dict.contains("teh"));
        assert!(dict.contains("Teh"));
        assert!(dict.contains("TEH"));
        assert!(!dict.contains("the"));
    }

    #[test]
    fn test_suggestions_follow_case() {
        let dict = sample();
        assert_eq!(dict.suggestions("Teh"), vec!["The"]);
        assert_eq!(dict.suggestions("TEH"), vec!["THE"]);
        assert_eq!(
            dict.suggestions("accomodate"),
            vec!["accommodate", "accommodates"]
        );
        assert!(dict.suggestions("fine").is_empty());
    }

    #[test]
    fn test_repeated_corrections_dropped() {
        let dict = Dictionary::from_entries([("teh", "the"), ("teh", "the"), ("teh", "tea")])
            .unwrap();
        assert_eq!(dict.suggestions("teh"), vec!["the", "tea"]);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_dump_is_sorted() {
        let dump = sample().dump();
        assert_eq!(dump[0], ("accomodate".to_string(), "accommodate".to_string()));
        assert_eq!(dump[1], ("accomodate".to_string(), "accommodates".to_string()));
        assert_eq!(dump.last().unwrap().0, "teh");
        assert_eq!(dump.len(), 5);
    }

    #[test]
    fn test_load_text_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.txt");
        fs::write(&path, "# comment\n\nabbout->about, abbot\nteh->the\n").unwrap();

        let dict = Dictionary::load(&DictionarySource::Text(path)).unwrap();
        assert_eq!(dict.suggestions("abbout"), vec!["about", "abbot"]);
        assert_eq!(dict.suggestions("teh"), vec!["the"]);
    }

    #[test]
    fn test_malformed_text_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.txt");
        fs::write(&path, "teh->the\nnot an entry\n").unwrap();

        match Dictionary::load(&DictionarySource::Text(path)) {
            Err(Error::MalformedEntry { line, content, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "not an entry");
            }
            other => panic!("expected malformed entry, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_empty_correction_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.txt");
        fs::write(&path, "teh->\n").unwrap();

        assert!(matches!(
            Dictionary::load(&DictionarySource::Text(path)),
            Err(Error::MalformedEntry { line: 1, .. })
        ));
    }

    #[test]
    fn test_load_json_layouts() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("table.json");
        fs::write(&table, r#"{"teh": "the", "abbout": ["about", "abbot"]}"#).unwrap();
        let pairs = dir.path().join("pairs.json");
        fs::write(&pairs, r#"[["teh", "the"], ["teh", "tea"]]"#).unwrap();

        let dict = Dictionary::load(&DictionarySource::Json(table)).unwrap();
        assert_eq!(dict.suggestions("abbout"), vec!["about", "abbot"]);
        assert_eq!(dict.suggestions("teh"), vec!["the"]);

        let dict = Dictionary::load(&DictionarySource::Json(pairs)).unwrap();
        assert_eq!(dict.suggestions("teh"), vec!["the", "tea"]);
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Dictionary::load(&DictionarySource::Json(path)),
            Err(Error::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_load_gzipped_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.json.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(br#"{"qick": "quick"}"#).unwrap();
        encoder.finish().unwrap();

        let dict = Dictionary::load(&DictionarySource::Json(path)).unwrap();
        assert_eq!(dict.suggestions("qick"), vec!["quick"]);
    }

    #[test]
    fn test_check_finds_every_occurrence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "first line\nsecond\nThe qick fox\nteh qick Teh\n").unwrap();

        let scan = sample().check(&path);
        assert!(scan.errors.is_empty());
        let found: Vec<_> = scan
            .matches
            .iter()
            .map(|m| (m.line, m.word.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![(3, "qick"), (4, "teh"), (4, "qick"), (4, "Teh")]
        );
        assert!(scan.matches.iter().all(|m| m.path == path));
    }

    #[test]
    fn test_check_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let scan = sample().check(&path);
        assert!(scan.matches.is_empty());
        assert_eq!(scan.errors.len(), 1);
        assert_eq!(scan.errors[0].path, path);
    }

    #[test]
    fn test_check_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, [b't', b'e', b'h', b' ', 0xff, 0xfe]).unwrap();

        let scan = sample().check(&path);
        assert!(scan.matches.is_empty());
        assert_eq!(scan.errors.len(), 1);
        assert!(scan.errors[0].message.starts_with("not valid UTF-8"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_does_not_stop_scan() {
        use crate::checker::scan;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked.txt");
        let open = dir.path().join("open.txt");
        fs::write(&locked, "teh\n").unwrap();
        fs::write(&open, "qick\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read(&locked).is_ok() {
            // running as root, permissions are not enforced
            return;
        }

        let dict = sample();
        let files = vec![locked.clone(), open.clone()];
        let scans: Vec<_> = scan(&files, &dict).collect();

        assert_eq!(scans.len(), 2);
        assert_eq!(scans[0].1.errors.len(), 1);
        assert_eq!(scans[0].1.errors[0].path, locked);
        assert!(scans[0].1.matches.is_empty());
        assert!(scans[1].1.errors.is_empty());
        assert_eq!(scans[1].1.matches.len(), 1);
        assert_eq!(scans[1].1.matches[0].word, "qick");

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    }
}
