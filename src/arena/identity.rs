//! Cache identity generation and persistence
//!
//! A cache id namespaces the cache storage of one arena. It is generated
//! once when the arena is created and read back on every activation.

use crate::error::{ChankoError, ChankoResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use tokio::fs;
use uuid::Uuid;

/// Digest bytes kept for an id (128 bits)
const ID_BYTES: usize = 16;

/// Opaque cache identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheId(String);

impl CacheId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read a persisted id
    ///
    /// A missing, unreadable or empty file means the arena state is corrupt.
    pub async fn load(path: &Path) -> ChankoResult<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ChankoError::CorruptState {
                path: path.to_path_buf(),
                reason: format!("cache id unreadable: {}", e),
            })?;

        let id = content.trim();
        if id.is_empty() {
            return Err(ChankoError::CorruptState {
                path: path.to_path_buf(),
                reason: "cache id is empty".to_string(),
            });
        }

        Ok(Self(id.to_string()))
    }

    /// Write the id to `path`, replacing any previous content
    pub async fn persist(&self, path: &Path) -> ChankoResult<()> {
        fs::write(path, &self.0)
            .await
            .map_err(|e| ChankoError::io(format!("writing cache id {}", path.display()), e))
    }
}

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;
type NonceSource = Box<dyn Fn() -> Uuid + Send + Sync>;

/// Generates fresh cache ids from a seed, the current time and a random nonce
pub struct CacheIdGenerator {
    clock: Clock,
    nonce: NonceSource,
}

impl CacheIdGenerator {
    /// Generator backed by the system clock and random UUIDs
    pub fn system() -> Self {
        Self {
            clock: Box::new(Utc::now),
            nonce: Box::new(Uuid::new_v4),
        }
    }

    /// Generator with injected time and nonce sources
    pub fn with_sources(
        clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
        nonce: impl Fn() -> Uuid + Send + Sync + 'static,
    ) -> Self {
        Self {
            clock: Box::new(clock),
            nonce: Box::new(nonce),
        }
    }

    /// Compute a new id for `seed` (normally the arena base path)
    pub fn new_id(&self, seed: &str) -> CacheId {
        let now = (self.clock)().to_rfc3339_opts(SecondsFormat::Nanos, true);
        let nonce = (self.nonce)();

        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        hasher.update(now.as_bytes());
        hasher.update(nonce.as_bytes());
        let digest = hasher.finalize();

        CacheId(hex::encode(&digest[..ID_BYTES]))
    }
}

impl Default for CacheIdGenerator {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for CacheIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheIdGenerator").finish_non_exhaustive()
    }
}
