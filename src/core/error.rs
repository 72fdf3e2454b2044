use thiserror::Error;

/// Core error types for Accolades
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input validation failed
    #[error("Validation error in {field}: {message}")]
    Validation { field: String, message: String },

    /// A raw category label has no canonical counterpart
    #[error("Unknown category: {0:?}")]
    UnknownCategory(String),

    /// Catalog exceeds the record limit
    #[error("Catalog contains {count} records (max: {max})")]
    CatalogTooLarge { count: usize, max: usize },

    /// Snapshot operation failed
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// XDG data directory could not be determined
    #[error("Data directory not available")]
    DataDirUnavailable,
}

/// Snapshot-specific errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid snapshot name: {0}")]
    InvalidName(String),

    #[error("Snapshot not found: {0}")]
    NotFound(String),

    #[error("Snapshot checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

impl Error {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Short, user-facing hint for the CLI
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Some("Check the catalog path, or set `catalog_path` in config.json")
            }
            Error::Serialization(_) => {
                Some("Catalog files must be a JSON array of rows or {\"opportunities\": [...]}")
            }
            Error::UnknownCategory(_) => {
                Some("Use one of: hackathon, internship, research, challenge")
            }
            Error::Snapshot(SnapshotError::NotFound(_)) => {
                Some("Run `accolades snapshot list` to see saved snapshots")
            }
            Error::DataDirUnavailable => {
                Some("Set HOME so the XDG data directory can be resolved")
            }
            _ => None,
        }
    }
}

/// Result type alias for Accolades operations
pub type Result<T> = std::result::Result<T, Error>;
