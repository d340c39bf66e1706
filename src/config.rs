use crate::checker::dictionary::DictionarySource;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG: &str = ".misspellings.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Plain-text `misspelling->correction` list
    #[serde(default)]
    pub misspelling_file: Option<PathBuf>,

    #[serde(default)]
    pub json_file: Option<PathBuf>,

    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Unset means "inherit", so a lower layer's choice survives
    #[serde(default)]
    pub include_hidden: Option<bool>,
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        r"\.(png|jpe?g|gif|ico|pdf|zip|gz|tar|jar|class|o|so|a|exe|dll)$".to_string(), // Binaries
        r"(^|/)(target|node_modules)/".to_string(), // Build output
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            misspelling_file: None,
            json_file: None,
            exclude_patterns: default_exclude_patterns(),
            include_hidden: None,
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(
        misspelling_file: Option<PathBuf>,
        json_file: Option<PathBuf>,
        cli_patterns: Vec<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                log::debug!("loading {}", global_path.display());
                config = config.merge(Self::from_file(&global_path)?);
            }
        }

        // Load local config (overrides global)
        let local_path = PathBuf::from(LOCAL_CONFIG);
        if local_path.exists() {
            log::debug!("loading {}", local_path.display());
            config = config.merge(Self::from_file(&local_path)?);
        }

        // Apply CLI overrides; either dictionary flag replaces both settings
        if misspelling_file.is_some() || json_file.is_some() {
            config.misspelling_file = misspelling_file;
            config.json_file = json_file;
        }
        config.exclude_patterns.extend(cli_patterns);

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        if other.misspelling_file.is_some() || other.json_file.is_some() {
            self.misspelling_file = other.misspelling_file;
            self.json_file = other.json_file;
        }
        if other.exclude_patterns != default_exclude_patterns() {
            self.exclude_patterns = other.exclude_patterns;
        }
        if other.include_hidden.is_some() {
            self.include_hidden = other.include_hidden;
        }
        self
    }

    pub fn include_hidden(&self) -> bool {
        self.include_hidden.unwrap_or(false)
    }

    /// The plain-text list wins if both files are configured.
    pub fn dictionary_source(&self) -> DictionarySource {
        match (&self.misspelling_file, &self.json_file) {
            (Some(path), _) => DictionarySource::Text(path.clone()),
            (None, Some(path)) => DictionarySource::Json(path.clone()),
            (None, None) => DictionarySource::Bundled,
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "misspellings")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
