use crate::core::catalog::DEFAULT_CLOSING_SOON_LIMIT;
use crate::core::error::{Error, Result};
use crate::core::snapshots::{CatalogSource, validate_snapshot_name};
use crate::utils::get_data_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog file read when a command gets no explicit `--catalog`
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Snapshot read when no catalog file is configured
    #[serde(default)]
    pub snapshot_name: Option<String>,
    /// Entries in the explore page's closing-soon strip (max 50)
    #[serde(default = "default_closing_soon_limit")]
    pub closing_soon_limit: usize,
    /// Initial value of the expired toggle when the query string has no `expired` key
    #[serde(default)]
    pub show_expired_by_default: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            snapshot_name: None,
            closing_soon_limit: DEFAULT_CLOSING_SOON_LIMIT,
            show_expired_by_default: false,
        }
    }
}

fn default_closing_soon_limit() -> usize {
    DEFAULT_CLOSING_SOON_LIMIT
}

impl AppConfig {
    /// Picks the catalog source: explicit path, then configured path, then
    /// configured snapshot, then the bundled sample.
    pub fn catalog_source(&self, explicit: Option<&Path>) -> CatalogSource {
        if let Some(path) = explicit {
            return CatalogSource::File(path.to_path_buf());
        }
        if let Some(path) = &self.catalog_path {
            return CatalogSource::File(path.clone());
        }
        if let Some(name) = &self.snapshot_name {
            return CatalogSource::Snapshot(name.clone());
        }
        CatalogSource::Sample
    }

    /// Closing-soon limit clamped to 1..=50
    pub fn closing_soon_limit(&self) -> usize {
        self.closing_soon_limit.clamp(1, 50)
    }

    /// Sets one field from its string form. An empty value clears optional
    /// fields and restores the default for the rest.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "catalog_path" => {
                self.catalog_path = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "snapshot_name" => {
                if value.is_empty() {
                    self.snapshot_name = None;
                } else {
                    validate_snapshot_name(value)?;
                    self.snapshot_name = Some(value.to_string());
                }
            }
            "closing_soon_limit" => {
                self.closing_soon_limit = if value.is_empty() {
                    DEFAULT_CLOSING_SOON_LIMIT
                } else {
                    value.parse().map_err(|_| {
                        Error::validation(key, format!("Expected a number, got {value:?}"))
                    })?
                };
            }
            "show_expired_by_default" => {
                self.show_expired_by_default = match value {
                    "" | "false" => false,
                    "true" => true,
                    _ => {
                        return Err(Error::validation(key, "Expected true or false"));
                    }
                };
            }
            _ => {
                return Err(Error::validation(
                    "key",
                    format!("Unknown config key {key:?}"),
                ));
            }
        }
        Ok(())
    }
}

/// Location of `config.json` in the data directory
pub fn config_path() -> Option<PathBuf> {
    get_data_dir().map(|dir| dir.join("config.json"))
}

/// Saves the config to `path` using an atomic write pattern.
/// 1. Writes to a temporary file.
/// 2. Sets restrictive permissions (0o600).
/// 3. Atomically renames to the target path.
///
/// # Async
/// Uses `tokio::fs` for non-blocking I/O.
pub async fn save_config_to(config: &AppConfig, path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    let temp_path = path.with_extension("json.tmp");

    #[cfg(unix)]
    {
        use tokio::fs::OpenOptions;
        use tokio::io::AsyncWriteExt;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(0o600)
            .open(&temp_path)
            .await?;

        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    #[cfg(not(unix))]
    {
        use tokio::io::AsyncWriteExt;

        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    tokio::fs::rename(temp_path, path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::StorageFull {
            std::io::Error::new(
                std::io::ErrorKind::StorageFull,
                "Disk full: cannot save configuration. Free up space and try again.",
            )
        } else {
            e
        }
    })
}

/// Loads the config from `path`, or returns the default if missing or invalid.
pub async fn load_config_from(path: &Path) -> AppConfig {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => serde_json::from_str::<AppConfig>(&json).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Saves the config to `<data dir>/config.json`.
pub async fn save_config(config: &AppConfig) -> std::io::Result<()> {
    if let Some(path) = config_path() {
        save_config_to(config, &path).await?;
    }
    Ok(())
}

/// Loads the config from `<data dir>/config.json`, or returns the default.
pub async fn load_config() -> AppConfig {
    match config_path() {
        Some(path) => load_config_from(&path).await,
        None => AppConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.closing_soon_limit, 5);
    }

    #[test]
    fn test_catalog_source_precedence() {
        let mut config = AppConfig::default();
        assert_eq!(config.catalog_source(None), CatalogSource::Sample);

        config.snapshot_name = Some("latest".into());
        assert_eq!(
            config.catalog_source(None),
            CatalogSource::Snapshot("latest".into())
        );

        config.catalog_path = Some(PathBuf::from("/srv/catalog.json"));
        assert_eq!(
            config.catalog_source(None),
            CatalogSource::File(PathBuf::from("/srv/catalog.json"))
        );

        assert_eq!(
            config.catalog_source(Some(Path::new("data.json"))),
            CatalogSource::File(PathBuf::from("data.json"))
        );
    }

    #[test]
    fn test_closing_soon_limit_clamped() {
        let mut config = AppConfig {
            closing_soon_limit: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.closing_soon_limit(), 1);
        config.closing_soon_limit = 500;
        assert_eq!(config.closing_soon_limit(), 50);
    }

    #[test]
    fn test_set_updates_and_clears_fields() {
        let mut config = AppConfig::default();

        config.set("catalog_path", "/srv/data.json").unwrap();
        config.set("snapshot_name", "latest").unwrap();
        config.set("closing_soon_limit", "8").unwrap();
        config.set("show_expired_by_default", "true").unwrap();
        assert_eq!(config.catalog_path, Some(PathBuf::from("/srv/data.json")));
        assert_eq!(config.snapshot_name.as_deref(), Some("latest"));
        assert_eq!(config.closing_soon_limit, 8);
        assert!(config.show_expired_by_default);

        for key in [
            "catalog_path",
            "snapshot_name",
            "closing_soon_limit",
            "show_expired_by_default",
        ] {
            config.set(key, "").unwrap();
        }
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = AppConfig::default();
        assert!(config.set("closing_soon_limit", "lots").is_err());
        assert!(config.set("show_expired_by_default", "yes").is_err());
        assert!(config.set("snapshot_name", "../etc").is_err());
        assert!(config.set("theme", "dark").is_err());
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_set_then_save_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = load_config_from(&path).await;
        config.set("snapshot_name", "nightly").unwrap();
        save_config_to(&config, &path).await.unwrap();

        let reloaded = load_config_from(&path).await;
        assert_eq!(
            reloaded.catalog_source(None),
            CatalogSource::Snapshot("nightly".into())
        );
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = AppConfig {
            catalog_path: Some(PathBuf::from("data.json")),
            snapshot_name: None,
            closing_soon_limit: 8,
            show_expired_by_default: true,
        };

        save_config_to(&config, &path).await.unwrap();
        assert_eq!(load_config_from(&path).await, config);
        assert!(!dir.path().join("config.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_invalid_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();
        assert_eq!(load_config_from(&path).await, AppConfig::default());
    }
}
