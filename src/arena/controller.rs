//! Arena lifecycle: initialization and activation

use crate::arena::detect::ChangeDetector;
use crate::arena::identity::{CacheId, CacheIdGenerator};
use crate::arena::layout::ArenaLayout;
use crate::arena::locate::ArenaRoot;
use crate::arena::lock::ArenaLock;
use crate::cache::{file_checksum, Cache, CacheKind, CacheProvider};
use crate::config::Config;
use crate::error::{ChankoError, ChankoResult};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// How to find the arena and whether to lock it
///
/// Passed explicitly instead of reading or writing process environment.
#[derive(Debug, Clone, Default)]
pub struct ArenaSettings {
    /// Arena base; the current directory when unset
    pub base: Option<PathBuf>,
    /// Hold the advisory lock during create/open
    pub lock: bool,
}

impl ArenaSettings {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base, lock: false }
    }

    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    /// Combine an explicit base (CLI / CHANKO_BASE) with the config file
    pub fn from_config(config: &Config, base: Option<PathBuf>) -> Self {
        Self {
            base: base.or_else(|| config.arena.base.clone()),
            lock: config.arena.lock,
        }
    }

    /// Resolve and validate the arena root
    pub fn resolve(&self) -> ChankoResult<ArenaRoot> {
        let nominal = match self.base {
            Some(ref base) => base.clone(),
            None => std::env::current_dir()
                .map_err(|e| ChankoError::io("getting current directory", e))?,
        };
        ArenaRoot::resolve(&nominal)
    }
}

/// Read-only snapshot of an arena, produced without refreshing anything
#[derive(Debug, Clone, Serialize)]
pub struct ArenaStatus {
    pub nominal: PathBuf,
    pub base: PathBuf,
    pub marker: PathBuf,
    pub initialized: bool,
    pub cache_id: Option<CacheId>,
    pub arch: Option<String>,
    pub current_checksum: Option<String>,
    pub expected_checksum: Option<String>,
    /// The next activation will refresh the remote cache
    pub stale: bool,
}

/// An activated arena
pub struct Arena {
    root: ArenaRoot,
    layout: ArenaLayout,
    cache_id: CacheId,
    remote_cache: Box<dyn Cache>,
    local_cache: Box<dyn Cache>,
    remote_cache_auto_refreshed: bool,
    lock: bool,
}

impl Arena {
    /// Initialize an arena from a sources list, returning its new cache id
    pub async fn create(settings: &ArenaSettings, sources_list: &Path) -> ChankoResult<CacheId> {
        Self::create_with(settings, sources_list, &CacheIdGenerator::system()).await
    }

    /// Initialize an arena using the given id generator
    ///
    /// Creation happens once; an existing `config/` or `archives/` is an error.
    pub async fn create_with(
        settings: &ArenaSettings,
        sources_list: &Path,
        generator: &CacheIdGenerator,
    ) -> ChankoResult<CacheId> {
        let root = settings.resolve()?;
        let layout = ArenaLayout::new(root.base());

        if !sources_list.exists() {
            return Err(ChankoError::SourcesListNotFound(sources_list.to_path_buf()));
        }

        let _lock = ArenaLock::acquire_if(settings.lock, &layout)?;

        for dir in layout.state_dirs() {
            if dir.exists() {
                return Err(ChankoError::AlreadyExists(dir));
            }
        }

        create_dir(&layout.config_dir()).await?;
        create_dir(&layout.partial_dir()).await?;

        let target = layout.sources_list();
        fs::copy(sources_list, &target).await.map_err(|e| {
            ChankoError::io(
                format!("copying {} to {}", sources_list.display(), target.display()),
                e,
            )
        })?;

        // Seed the stored checksum so the first open is consistent
        let checksum = file_checksum(&target).await?;
        ChangeDetector::new(&layout).record(&checksum).await?;

        let cache_id = generator.new_id(&root.base().to_string_lossy());
        cache_id.persist(&layout.cache_id_file()).await?;

        info!("Created arena at {} (cache id {})", root.base().display(), cache_id);
        Ok(cache_id)
    }

    /// Activate an initialized arena
    ///
    /// Runs sources.list change detection exactly once, refreshing the
    /// remote cache if the sources changed since the last consistent point.
    pub async fn open(
        settings: &ArenaSettings,
        provider: &dyn CacheProvider,
    ) -> ChankoResult<Self> {
        let root = settings.resolve()?;
        let layout = ArenaLayout::new(root.base());

        for dir in layout.state_dirs() {
            if !dir.exists() {
                return Err(ChankoError::NotInitialized(dir));
            }
        }

        let _lock = ArenaLock::acquire_if(settings.lock, &layout)?;

        // Tolerate an interrupted session that removed it
        create_dir(&layout.partial_dir()).await?;

        let cache_id = CacheId::load(&layout.cache_id_file()).await?;
        debug!("Opening arena {} with cache id {}", root.base().display(), cache_id);

        let remote_cache = provider.build(CacheKind::Remote, &cache_id, &layout);
        let local_cache = provider.build(CacheKind::Local, &cache_id, &layout);

        let freshness = ChangeDetector::new(&layout)
            .run(remote_cache.as_ref())
            .await?;

        Ok(Self {
            root,
            layout,
            cache_id,
            remote_cache,
            local_cache,
            remote_cache_auto_refreshed: freshness.refreshed(),
            lock: settings.lock,
        })
    }

    /// Describe an arena without activating it
    pub async fn inspect(settings: &ArenaSettings) -> ChankoResult<ArenaStatus> {
        let root = settings.resolve()?;
        let layout = ArenaLayout::new(root.base());
        let initialized = layout.state_dirs().iter().all(|dir| dir.exists());

        let mut status = ArenaStatus {
            nominal: root.nominal().to_path_buf(),
            base: root.base().to_path_buf(),
            marker: root.marker().to_path_buf(),
            initialized,
            cache_id: None,
            arch: None,
            current_checksum: None,
            expected_checksum: None,
            stale: false,
        };

        if !initialized {
            return Ok(status);
        }

        let detector = ChangeDetector::new(&layout);
        let current = detector.current_checksum().await?;
        let expected = detector.expected_checksum().await?;

        status.stale = current != expected;
        status.current_checksum = Some(current);
        status.expected_checksum = Some(expected).filter(|c| !c.is_empty());
        status.cache_id = Some(CacheId::load(&layout.cache_id_file()).await?);
        status.arch = read_optional(&layout.arch_file()).await?;

        Ok(status)
    }

    /// Refresh one of the caches on demand
    ///
    /// A successful remote refresh also marks the current sources list as
    /// the consistent point. With locking enabled the arena lock is held
    /// across the refresh and the checksum write, as during `open`.
    pub async fn refresh(&self, kind: CacheKind) -> ChankoResult<()> {
        match kind {
            CacheKind::Remote => {
                let _lock = ArenaLock::acquire_if(self.lock, &self.layout)?;
                let detector = ChangeDetector::new(&self.layout);
                let current = detector.current_checksum().await?;
                self.remote_cache
                    .refresh()
                    .await
                    .map_err(|e| ChankoError::refresh_failed(kind, e))?;
                detector.record(&current).await
            }
            CacheKind::Local => self
                .local_cache
                .refresh()
                .await
                .map_err(|e| ChankoError::refresh_failed(kind, e)),
        }
    }

    pub fn root(&self) -> &ArenaRoot {
        &self.root
    }

    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    pub fn cache_id(&self) -> &CacheId {
        &self.cache_id
    }

    pub fn remote_cache(&self) -> &dyn Cache {
        self.remote_cache.as_ref()
    }

    pub fn local_cache(&self) -> &dyn Cache {
        self.local_cache.as_ref()
    }

    /// Whether activation refreshed the remote cache because sources changed
    pub fn remote_cache_auto_refreshed(&self) -> bool {
        self.remote_cache_auto_refreshed
    }
}

async fn create_dir(dir: &Path) -> ChankoResult<()> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| ChankoError::io(format!("creating directory {}", dir.display()), e))
}

async fn read_optional(path: &Path) -> ChankoResult<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content.trim().to_string()).filter(|s| !s.is_empty())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ChankoError::io(format!("reading {}", path.display()), e)),
    }
}
