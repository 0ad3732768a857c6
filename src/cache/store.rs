//! Filesystem-backed cache storage
//!
//! Each cache lives in `<root>/<cache_id>/<kind>/` and is described by an
//! `index.json` written on every refresh.

use crate::arena::{ArenaLayout, CacheId};
use crate::cache::checksum::checksum_bytes;
use crate::cache::sources::{parse_sources_list, SourceEntry};
use crate::cache::{Cache, CacheKind, CacheProvider};
use crate::config::Config;
use crate::error::{ChankoError, ChankoResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const INDEX_FILE: &str = "index.json";

/// Package archive found in the arena
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub size_bytes: u64,
}

/// Persisted description of a cache's contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheIndex {
    pub kind: CacheKind,
    pub cache_id: CacheId,
    pub refreshed_at: DateTime<Utc>,
    /// Checksum of the sources list the remote index was built from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_checksum: Option<String>,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
    #[serde(default)]
    pub archives: Vec<ArchiveEntry>,
}

/// Provider storing caches under a common root directory
#[derive(Debug, Clone)]
pub struct FsCacheProvider {
    root: PathBuf,
}

impl FsCacheProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `cache.dir` from the config, falling back to the user cache dir
    pub fn from_config(config: &Config) -> Self {
        let root = config
            .cache
            .dir
            .clone()
            .unwrap_or_else(Self::default_root);
        Self::new(root)
    }

    /// Default storage root (`~/.cache/chanko` on Linux)
    pub fn default_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chanko")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CacheProvider for FsCacheProvider {
    fn build(&self, kind: CacheKind, id: &CacheId, layout: &ArenaLayout) -> Box<dyn Cache> {
        let dir = self.root.join(id.as_str()).join(kind.as_str());
        Box::new(FsCache::new(kind, id.clone(), layout.clone(), dir))
    }
}

/// A single cache stored on the local filesystem
#[derive(Debug, Clone)]
pub struct FsCache {
    kind: CacheKind,
    cache_id: CacheId,
    layout: ArenaLayout,
    dir: PathBuf,
}

impl FsCache {
    pub fn new(kind: CacheKind, cache_id: CacheId, layout: ArenaLayout, dir: PathBuf) -> Self {
        Self {
            kind,
            cache_id,
            layout,
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    /// Load the current index, if the cache was ever refreshed
    pub async fn load_index(&self) -> ChankoResult<Option<CacheIndex>> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| ChankoError::io(format!("reading cache index {}", path.display()), e))?;

        Ok(Some(serde_json::from_str(&content)?))
    }

    fn empty_index(&self) -> CacheIndex {
        CacheIndex {
            kind: self.kind,
            cache_id: self.cache_id.clone(),
            refreshed_at: Utc::now(),
            sources_checksum: None,
            sources: vec![],
            archives: vec![],
        }
    }

    async fn build_remote_index(&self) -> ChankoResult<CacheIndex> {
        let path = self.layout.sources_list();
        let bytes = fs::read(&path)
            .await
            .map_err(|e| ChankoError::io(format!("reading {}", path.display()), e))?;

        // Copied verbatim at init; legacy encodings only show up in comments
        let sources = parse_sources_list(&String::from_utf8_lossy(&bytes))?;
        debug!("Parsed {} source entries", sources.len());

        Ok(CacheIndex {
            sources_checksum: Some(checksum_bytes(&bytes)),
            sources,
            ..self.empty_index()
        })
    }

    async fn build_local_index(&self) -> ChankoResult<CacheIndex> {
        let archives_dir = self.layout.archives_dir();
        let mut archives = vec![];

        let mut entries = fs::read_dir(&archives_dir)
            .await
            .map_err(|e| ChankoError::io(format!("reading {}", archives_dir.display()), e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ChankoError::io("reading archives entry", e))?
        {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "deb") {
                continue;
            }

            let metadata = entry
                .metadata()
                .await
                .map_err(|e| ChankoError::io(format!("inspecting {}", path.display()), e))?;
            if !metadata.is_file() {
                continue;
            }

            archives.push(ArchiveEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size_bytes: metadata.len(),
            });
        }

        archives.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(CacheIndex {
            archives,
            ..self.empty_index()
        })
    }

    /// Write the index through a temporary sibling so readers never see a partial file
    async fn write_index(&self, index: &CacheIndex) -> ChankoResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ChankoError::io(format!("creating {}", self.dir.display()), e))?;

        let path = self.index_path();
        let tmp = self.dir.join(format!("{}.tmp", INDEX_FILE));
        let content = serde_json::to_string_pretty(index)?;

        fs::write(&tmp, content)
            .await
            .map_err(|e| ChankoError::io(format!("writing {}", tmp.display()), e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| ChankoError::io(format!("replacing {}", path.display()), e))?;

        Ok(())
    }
}

#[async_trait]
impl Cache for FsCache {
    fn kind(&self) -> CacheKind {
        self.kind
    }

    async fn refresh(&self) -> ChankoResult<()> {
        let index = match self.kind {
            CacheKind::Remote => self.build_remote_index().await?,
            CacheKind::Local => self.build_local_index().await?,
        };

        self.write_index(&index).await?;
        info!(
            "Refreshed {} cache {} ({} sources, {} archives)",
            self.kind,
            self.cache_id,
            index.sources.len(),
            index.archives.len()
        );
        Ok(())
    }

    async fn last_refresh(&self) -> ChankoResult<Option<DateTime<Utc>>> {
        Ok(self.load_index().await?.map(|index| index.refreshed_at))
    }
}
