//! Session configuration.
//!
//! # Responsibility
//! - Hold the backing-file location and logging settings for one session.
//! - Offer an explicit environment overlay; core never reads env implicitly.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Backing file used when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "library.json";

pub const ENV_DATA_PATH: &str = "BOOKSHELF_DATA";
pub const ENV_LOG_LEVEL: &str = "BOOKSHELF_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BOOKSHELF_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// JSON file holding the whole collection.
    pub data_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl LibraryConfig {
    /// Defaults overlaid with `BOOKSHELF_*` environment variables.
    ///
    /// Blank values are ignored.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by the `ENV_*` names.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = get(ENV_DATA_PATH) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{LibraryConfig, DEFAULT_DATA_FILE, ENV_DATA_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn default_points_at_library_json() {
        let config = LibraryConfig::default();
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_FILE));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn overlay_applies_non_blank_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_DATA_PATH, "/tmp/books.json"),
            (ENV_LOG_LEVEL, "  "),
            (ENV_LOG_DIR, "/tmp/logs"),
        ]);
        let config =
            LibraryConfig::default().overlay(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.data_path, PathBuf::from("/tmp/books.json"));
        assert_eq!(config.log_level, LibraryConfig::default().log_level);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
    }
}
