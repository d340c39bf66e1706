//! Turn command-line arguments into the ordered list of files to scan.

use crate::error::{Error, Result};
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub struct FileSet {
    exclude: Vec<Regex>,
    include_hidden: bool,
}

impl FileSet {
    pub fn new(exclude_patterns: &[String], include_hidden: bool) -> Result<Self> {
        let exclude = exclude_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| Error::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            exclude,
            include_hidden,
        })
    }

    /// Expand `args` in order. Directories are walked with entries sorted
    /// by name; paths that do not exist are passed through so the scan can
    /// report them.
    pub fn resolve(&self, args: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for arg in args {
            if !arg.is_dir() {
                if !self.is_excluded(arg) {
                    files.push(arg.clone());
                }
                continue;
            }

            let walker = WalkDir::new(arg)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| entry.depth() == 0 || self.keep_entry(entry));

            for entry in walker {
                match entry {
                    Ok(entry) if entry.file_type().is_dir() => {}
                    Ok(entry) => files.push(entry.into_path()),
                    Err(e) => match e.path() {
                        // Let the scan report what could not be listed
                        Some(path) => files.push(path.to_path_buf()),
                        None => log::warn!("skipping {}: {}", arg.display(), e),
                    },
                }
            }
        }

        log::debug!("resolved {} files", files.len());
        files
    }

    fn keep_entry(&self, entry: &DirEntry) -> bool {
        let hidden = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'));

        !(hidden && !self.include_hidden) && !self.is_excluded(entry.path())
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.exclude.iter().any(|re| re.is_match(&path))
    }
}

/// Read a list of paths, one per line. `-` reads standard input.
pub fn read_file_list(path: &Path) -> Result<Vec<PathBuf>> {
    if path == Path::new("-") {
        return parse_file_list(io::stdin().lock());
    }

    let file = File::open(path)?;
    parse_file_list(BufReader::new(file))
}

fn parse_file_list<R: BufRead>(reader: R) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            files.push(PathBuf::from(line));
        }
    }
    Ok(files)
}
