//! Error types for Chanko
//!
//! All modules use `ChankoResult<T>` as their return type.

use crate::cache::CacheKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Chanko operations
pub type ChankoResult<T> = Result<T, ChankoError>;

/// All errors that can occur in Chanko
#[derive(Error, Debug)]
pub enum ChankoError {
    // Arena errors
    #[error("Not inside a sumo arena: {}", path.display())]
    NotAnArena { path: PathBuf },

    #[error("No such sources.list: {0}")]
    SourcesListNotFound(PathBuf),

    #[error("Arena already initialized: {0} exists")]
    AlreadyExists(PathBuf),

    #[error("Arena not initialized: {0} does not exist")]
    NotInitialized(PathBuf),

    #[error("Corrupt arena state at {}: {reason}", path.display())]
    CorruptState { path: PathBuf, reason: String },

    #[error("Arena is locked by another process: {0}")]
    ArenaLocked(PathBuf),

    // Cache errors
    #[error("Failed to refresh {kind} cache: {source}")]
    RefreshFailed {
        kind: CacheKind,
        #[source]
        source: Box<ChankoError>,
    },

    #[error("Invalid sources.list entry at line {line}: {reason}")]
    SourcesListInvalid { line: usize, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {}: {reason}", path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("{0}")]
    ConfigValue(String),

    #[error("Failed to create config directory {}: {source}", path.display())]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl ChankoError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap a cache failure as a refresh failure
    pub fn refresh_failed(kind: CacheKind, source: ChankoError) -> Self {
        Self::RefreshFailed {
            kind,
            source: Box::new(source),
        }
    }

    /// Check if error is retryable
    ///
    /// A failed refresh leaves the stored checksum stale, so the next
    /// activation retries it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RefreshFailed { .. } | Self::ArenaLocked(_))
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotAnArena { .. } => {
                Some("Run from inside an arena.union directory, or pass --base / set CHANKO_BASE")
            }
            Self::NotInitialized(_) => Some("Run: chanko init <sources.list>"),
            Self::AlreadyExists(_) => Some("The arena is already initialized; use: chanko refresh"),
            Self::RefreshFailed { .. } => {
                Some("Fix the problem and run any chanko command to retry")
            }
            Self::ArenaLocked(_) => Some("Wait for the other chanko process to finish"),
            _ => None,
        }
    }
}
