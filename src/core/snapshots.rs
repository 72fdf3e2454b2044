//! Catalog files and cached snapshots
//!
//! A catalog file is either a JSON array of rows or an object with an
//! `opportunities` array (the seed `data.json` layout). Snapshots are catalog
//! files this crate writes itself, stored in the data directory under
//! `snapshots/` together with a `.sha256` checksum.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result, SnapshotError};
use crate::core::opportunity::{MAX_OPPORTUNITIES, Opportunity, normalize_rows};
use crate::utils::get_data_dir;

/// Where a command reads its catalog from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Snapshot(String),
    /// Bundled sample data, used when nothing else is configured
    Sample,
}

/// Validates a snapshot name for filesystem safety.
///
/// Constraints:
/// - Alphanumeric, underscores, and hyphens only
/// - Max 64 chars
pub fn validate_snapshot_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SnapshotError::InvalidName("Name cannot be empty".into()).into());
    }

    if name.len() > 64 {
        return Err(SnapshotError::InvalidName("Name too long (max 64 chars)".into()).into());
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(SnapshotError::InvalidName(
            "Name contains invalid characters (use only a-z, 0-9, _, -)".into(),
        )
        .into());
    }

    Ok(())
}

/// Parses catalog JSON into canonical opportunities.
///
/// Individual bad rows are skipped (see [`normalize_rows`]); only a document
/// that is not a catalog at all is an error.
pub fn parse_catalog_json(json: &str) -> Result<Vec<Opportunity>> {
    let document: serde_json::Value = serde_json::from_str(json)?;

    let rows = match document {
        serde_json::Value::Array(rows) => rows,
        serde_json::Value::Object(mut object) => match object.remove("opportunities") {
            Some(serde_json::Value::Array(rows)) => rows,
            _ => {
                return Err(Error::validation(
                    "catalog",
                    "JSON root is missing the \"opportunities\" array",
                ));
            }
        },
        _ => {
            return Err(Error::validation(
                "catalog",
                "Catalog must be an array of rows or an object",
            ));
        }
    };

    if rows.len() > MAX_OPPORTUNITIES {
        return Err(Error::CatalogTooLarge {
            count: rows.len(),
            max: MAX_OPPORTUNITIES,
        });
    }

    Ok(normalize_rows(rows))
}

fn checksum(json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Loads a catalog file from an arbitrary path.
///
/// # Async
/// Uses `tokio::fs` for non-blocking file I/O.
pub async fn load_catalog_file(path: &Path) -> Result<Vec<Opportunity>> {
    let json = tokio::fs::read_to_string(path).await?;
    let catalog = parse_catalog_json(&json)?;
    tracing::debug!("Loaded {} opportunities from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Gets the directory where snapshots are stored, creating it when missing.
pub async fn get_snapshots_dir() -> Result<PathBuf> {
    let mut path = get_data_dir().ok_or(Error::DataDirUnavailable)?;
    path.push("snapshots");

    if !tokio::fs::try_exists(&path).await? {
        tokio::fs::create_dir_all(&path).await?;
    }

    Ok(path)
}

/// Path of a named snapshot inside `dir`. Validates the name first.
pub fn snapshot_path_in(dir: &Path, name: &str) -> Result<PathBuf> {
    validate_snapshot_name(name)?;
    Ok(dir.join(format!("{name}.json")))
}

/// Lists snapshot names found in `dir`, sorted
pub async fn list_snapshots_in(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        if path.is_file()
            && path.extension().and_then(|s| s.to_str()) == Some("json")
            && let Some(name) = path.file_stem().and_then(|s| s.to_str())
        {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

/// Loads a snapshot from `dir`.
///
/// A checksum mismatch is logged but not fatal: snapshots may be edited by hand.
pub async fn load_snapshot_in(dir: &Path, name: &str) -> Result<Vec<Opportunity>> {
    let path = snapshot_path_in(dir, name)?;

    if !tokio::fs::try_exists(&path).await? {
        return Err(SnapshotError::NotFound(name.to_string()).into());
    }

    let json = tokio::fs::read_to_string(&path).await?;

    let mut checksum_path = path.clone();
    checksum_path.set_extension("json.sha256");
    if let Ok(expected) = tokio::fs::read_to_string(&checksum_path).await {
        let actual = checksum(&json);
        if expected.trim() != actual {
            tracing::warn!(
                "{}",
                SnapshotError::ChecksumMismatch {
                    expected: expected.trim().to_string(),
                    actual,
                }
            );
        }
    }

    parse_catalog_json(&json)
}

/// Saves a snapshot into `dir` atomically (temp file + rename) with a checksum.
pub async fn save_snapshot_in(dir: &Path, name: &str, catalog: &[Opportunity]) -> Result<PathBuf> {
    let path = snapshot_path_in(dir, name)?;
    let json = serde_json::to_string_pretty(catalog)?;

    let mut temp_path = path.clone();
    temp_path.set_extension("json.tmp");

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
        tokio::fs::write(&temp_path, &json).await?;
    }

    tokio::fs::rename(&temp_path, &path).await?;

    let mut checksum_path = path.clone();
    checksum_path.set_extension("json.sha256");
    tokio::fs::write(checksum_path, checksum(&json)).await?;

    tracing::info!("Saved snapshot '{}' ({} opportunities)", name, catalog.len());
    Ok(path)
}

pub async fn list_snapshots() -> Result<Vec<String>> {
    list_snapshots_in(&get_snapshots_dir().await?).await
}

pub async fn load_snapshot(name: &str) -> Result<Vec<Opportunity>> {
    load_snapshot_in(&get_snapshots_dir().await?, name).await
}

pub async fn save_snapshot(name: &str, catalog: &[Opportunity]) -> Result<PathBuf> {
    save_snapshot_in(&get_snapshots_dir().await?, name, catalog).await
}

/// Loads the catalog for `source`.
pub async fn load_source(source: &CatalogSource) -> Result<Vec<Opportunity>> {
    match source {
        CatalogSource::File(path) => load_catalog_file(path).await,
        CatalogSource::Snapshot(name) => load_snapshot(name).await,
        CatalogSource::Sample => {
            tracing::info!("Using bundled sample catalog (no catalog source configured)");
            Ok(crate::core::sample::sample_catalog())
        }
    }
}
