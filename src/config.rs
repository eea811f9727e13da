//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::constants::corpus::DEFAULT_TRANSLATION;
use crate::corpus::Case;
use crate::error::{Error, Result};
use crate::services::search::SearchMode;

/// Directory of the corpus files.
pub const CORPUS_PATH_VAR: &str = "LECTERN_CORPUS_PATH";
/// Whether searches match case by default.
pub const MATCH_CASE_VAR: &str = "LECTERN_MATCH_CASE";
/// Default search mode.
pub const SEARCH_MODE_VAR: &str = "LECTERN_SEARCH_MODE";
/// Translation label for status lines.
pub const TRANSLATION_VAR: &str = "LECTERN_TRANSLATION";

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Directory holding `info.json`, `display.txt` and `stripped.txt`
    pub corpus_path: PathBuf,
    /// Case handling for new searches
    pub match_case: Case,
    /// Mode for new searches
    pub search_mode: SearchMode,
    /// Translation label shown after citations
    pub translation: String,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            corpus_path: default_corpus_path(),
            match_case: Case::Insensitive,
            search_mode: SearchMode::Substring,
            translation: DEFAULT_TRANSLATION.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup(CORPUS_PATH_VAR) {
            config.corpus_path = PathBuf::from(shellexpand::tilde(&path).to_string());
        }

        if let Some(flag) = lookup(MATCH_CASE_VAR) {
            config.match_case = parse_case(&flag).ok_or_else(|| {
                Error::config(
                    format!("{MATCH_CASE_VAR} has unrecognised value {flag:?}"),
                    "Use true or false",
                )
            })?;
        }

        if let Some(mode) = lookup(SEARCH_MODE_VAR) {
            config.search_mode = mode.parse()?;
        }

        if let Some(label) = lookup(TRANSLATION_VAR).filter(|l| !l.trim().is_empty()) {
            config.translation = label.trim().to_string();
        }

        Ok(config)
    }

    /// Check if the corpus directory exists
    pub fn has_corpus(&self) -> bool {
        self.corpus_path.is_dir()
    }
}

/// Default corpus location under the platform data directory.
fn default_corpus_path() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from("lectern"), |dir| dir.join("lectern"))
}

/// Interpret a case-matching flag.
fn parse_case(flag: &str) -> Option<Case> {
    match flag.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "sensitive" => Some(Case::Sensitive),
        "0" | "false" | "no" | "off" | "insensitive" => Some(Case::Insensitive),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.app_name(), "lectern");
        assert_eq!(config.translation, "KJV");
        assert_eq!(config.match_case, Case::Insensitive);
        assert_eq!(config.search_mode, SearchMode::Substring);
        assert!(config.corpus_path.ends_with("lectern"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (CORPUS_PATH_VAR, "/srv/bible"),
            (MATCH_CASE_VAR, "yes"),
            (SEARCH_MODE_VAR, "phrase"),
            (TRANSLATION_VAR, " AV "),
        ]))
        .unwrap();
        assert_eq!(config.corpus_path, PathBuf::from("/srv/bible"));
        assert_eq!(config.match_case, Case::Sensitive);
        assert_eq!(config.search_mode, SearchMode::Phrase);
        assert_eq!(config.translation, "AV");
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = Config::from_lookup(lookup(&[(CORPUS_PATH_VAR, "~/bible")])).unwrap();
        assert!(!config.corpus_path.starts_with("~"));
        assert!(config.corpus_path.ends_with("bible"));
    }

    #[test]
    fn test_bad_values_are_config_errors() {
        let err = Config::from_lookup(lookup(&[(SEARCH_MODE_VAR, "fuzzy")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        let err = Config::from_lookup(lookup(&[(MATCH_CASE_VAR, "maybe")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
