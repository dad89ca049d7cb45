use crate::models::SearchField;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Loaded from `<config dir>/bookfinder/config.toml`; every field has a
/// default so a missing or partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> crate::Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Get the config file path (XDG on Linux, platform equivalents elsewhere)
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?;
        Ok(config_dir.join("bookfinder").join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Search endpoint
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Catalog site that record keys are relative to
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Cover image host
    #[serde(default = "default_covers_url")]
    pub covers_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_search_url() -> String {
    "https://openlibrary.org/search.json".to_string()
}

fn default_catalog_url() -> String {
    "https://openlibrary.org".to_string()
}

fn default_covers_url() -> String {
    "https://covers.openlibrary.org".to_string()
}

fn default_user_agent() -> String {
    format!("BookFinder/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            catalog_url: default_catalog_url(),
            covers_url: default_covers_url(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Field used when none is given: title, author, subject, isbn;
    /// anything else means full-text search
    #[serde(default = "default_field")]
    pub default_field: String,
}

fn default_field() -> String {
    "title".to_string()
}

impl SearchConfig {
    pub fn field(&self) -> SearchField {
        SearchField::from_name(&self.default_field)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_field: default_field(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding the favorites slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// When false, favorites only last for the current run
    #[serde(default = "default_persist")]
    pub persist_favorites: bool,
}

fn default_persist() -> bool {
    true
}

impl StorageConfig {
    /// Configured path, or `<data dir>/bookfinder/bookfinder.db`
    pub fn resolved_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?;
        Ok(data_dir.join("bookfinder").join("bookfinder.db"))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            persist_favorites: default_persist(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.search_url, "https://openlibrary.org/search.json");
        assert_eq!(config.search.field(), SearchField::Title);
        assert!(config.storage.persist_favorites);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [search]
            default_field = "author"

            [storage]
            persist_favorites = false
            "#,
        )
        .unwrap();

        assert_eq!(config.search.field(), SearchField::Author);
        assert!(!config.storage.persist_favorites);
        assert_eq!(config.api.covers_url, "https://covers.openlibrary.org");
    }

    #[test]
    fn test_unknown_default_field_is_full_text() {
        let search = SearchConfig {
            default_field: "publisher".into(),
        };
        assert_eq!(search.field(), SearchField::All);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookfinder").join("config.toml");

        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("favs.db"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.storage.path, config.storage.path);
        assert_eq!(loaded.storage.resolved_path().unwrap(), dir.path().join("favs.db"));
    }

    #[test]
    fn test_config_serialization() {
        let toml = Config::default().to_toml().unwrap();
        assert!(toml.contains("search_url"));
        assert!(toml.contains("default_field"));
        assert!(!toml.contains("path ="));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.search.default_field, "title");
    }

    #[test]
    fn test_broken_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nsearch_url = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(crate::Error::ConfigError(_))
        ));
    }
}
