//! Package caches bound to an arena
//!
//! Every arena owns two caches keyed by its cache id:
//!
//! | Kind | Contents |
//! |------|----------|
//! | remote | Package indexes derived from `config/sources.list` |
//! | local | Archives already present under `archives/` |
//!
//! The arena controller only talks to caches through the [`Cache`] trait,
//! so storage backends can be swapped without touching change detection.

pub mod checksum;
pub mod sources;
pub mod store;

pub use checksum::{checksum_bytes, file_checksum};
pub use sources::{parse_sources_list, SourceEntry, SourceType};
pub use store::{CacheIndex, FsCache, FsCacheProvider};

use crate::arena::{ArenaLayout, CacheId};
use crate::config::Config;
use crate::error::ChankoResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two arena caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    Remote,
    Local,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache collaborator interface
#[async_trait]
pub trait Cache: Send + Sync {
    /// Which cache this is
    fn kind(&self) -> CacheKind;

    /// Fully repopulate the cache; blocks until done or failed
    async fn refresh(&self) -> ChankoResult<()>;

    /// When the cache was last refreshed, if the backend tracks it
    async fn last_refresh(&self) -> ChankoResult<Option<DateTime<Utc>>> {
        Ok(None)
    }
}

/// Builds the caches of an arena during activation
pub trait CacheProvider: Send + Sync {
    fn build(&self, kind: CacheKind, id: &CacheId, layout: &ArenaLayout) -> Box<dyn Cache>;
}

/// Create the cache provider selected by the configuration
pub fn create_provider(config: &Config) -> Box<dyn CacheProvider> {
    Box::new(FsCacheProvider::from_config(config))
}
