use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the lock updater.
/// Every module returns `Result<T, LockError>`.
#[derive(Debug, Error)]
pub enum LockError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed for {url}: HTTP {status}")]
    RequestFailed { url: String, status: u16 },

    // ── Maven ───────────────────────────────────────────
    #[error("Invalid Maven coordinate: {0}")]
    InvalidMavenCoordinate(String),

    // ── Versions ────────────────────────────────────────
    #[error("Cannot derive a game version from loader version {0:?}")]
    InvalidLoaderVersion(String),

    #[error("Game version {0} not found in manifest")]
    GameVersionNotFound(String),

    #[error("Game version {0} has no server mappings download")]
    MissingServerMappings(String),

    #[error("Descriptor for {version} is missing {entry}")]
    MissingDescriptorEntry { version: String, entry: String },

    // ── Formats ─────────────────────────────────────────
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type LockResult<T> = Result<T, LockError>;

impl From<std::io::Error> for LockError {
    fn from(source: std::io::Error) -> Self {
        LockError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
