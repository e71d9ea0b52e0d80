use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const CONFIG_FILE: &str = "pagefeed.toml";

/// default values, matching the layout of the news site
pub const PAGES_ROOT: &str = "src/app";
pub const PAGE_TEMPLATE: &str = "page.jsx";
pub const PAGES_EXCLUDE: &str = "fonts";
pub const FEEDS_PATH: &str = "feeds.json";
pub const FEEDS_EXCLUDE: &str = "anyfeeder";

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(pagefeed::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(pagefeed::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config file not found: '{path}'")]
    #[diagnostic(
        code(pagefeed::config::not_found),
        help("Pass an existing file to --config, or omit it to use pagefeed.toml when present")
    )]
    NotFound { path: PathBuf },
}

/// Settings for distributing the page template.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PagesConfig {
    /// directory whose immediate subdirectories receive the template
    pub root: PathBuf,
    /// file name of the template, relative to `root`
    pub template: String,
    /// subdirectory name that never receives the template
    pub exclude: String,
}
impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            root: PAGES_ROOT.into(),
            template: PAGE_TEMPLATE.into(),
            exclude: PAGES_EXCLUDE.into(),
        }
    }
}

/// Settings for pruning the feed list.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FeedsConfig {
    /// json file holding the array of feed records
    pub path: PathBuf,
    /// literal substring; feeds whose url contains it are dropped
    pub exclude: String,
}
impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            path: FEEDS_PATH.into(),
            exclude: FEEDS_EXCLUDE.into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub pages: PagesConfig,
    pub feeds: FeedsConfig,
}
impl Config {
    /// Loads the config from `path` when given, otherwise from [`CONFIG_FILE`] in the
    /// working directory if it exists, otherwise falls back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if !path.is_file() => Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }),
            Some(path) => Self::from_file(path),
            None => {
                let default_file = Path::new(CONFIG_FILE);
                if default_file.is_file() {
                    Self::from_file(default_file)
                } else {
                    log::debug!("no {} found, using defaults", CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let parsed = toml::from_str(&content).map_err(|err| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: err,
        })?;

        log::debug!("loaded config from {}", path.display());

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.pages.root, PathBuf::from("src/app"));
        assert_eq!(config.feeds.exclude, "anyfeeder");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [pages]
            root = "web/app"

            [feeds]
            exclude = "example.org"
            "#,
        )
        .unwrap();

        assert_eq!(config.pages.root, PathBuf::from("web/app"));
        assert_eq!(config.pages.template, "page.jsx");
        assert_eq!(config.pages.exclude, "fonts");
        assert_eq!(config.feeds.path, PathBuf::from("feeds.json"));
        assert_eq!(config.feeds.exclude, "example.org");
    }

    #[test]
    fn test_load_explicit_missing_file_is_err() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let result = Config::load(Some(missing.as_path()));

        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_from_file_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pagefeed.toml");
        fs::write(&file, "[pages\nroot = 1").unwrap();

        match Config::from_file(&file) {
            Err(ConfigError::ParseToml { path, .. }) => assert_eq!(path, file),
            other => panic!("expected toml parse error, got {:?}", other),
        }
    }
}
