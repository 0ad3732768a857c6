//! On-disk layout of an arena
//!
//! ```text
//! <base>/
//!   config/
//!     sources.list
//!     sources.list.md5
//!     cache_id
//!     arch
//!   archives/
//!     partial/
//!   .chanko.lock        (only with arena locking enabled)
//! ```

use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "config";
const ARCHIVES_DIR: &str = "archives";
const PARTIAL_DIR: &str = "partial";
const SOURCES_LIST: &str = "sources.list";
const SOURCES_LIST_CHECKSUM: &str = "sources.list.md5";
const CACHE_ID: &str = "cache_id";
const ARCH: &str = "arch";
const LOCK_FILE: &str = ".chanko.lock";

/// Fixed locations below an arena base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaLayout {
    base: PathBuf,
}

impl ArenaLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config_dir(&self) -> PathBuf {
        self.base.join(CONFIG_DIR)
    }

    /// Verbatim copy of the user-supplied sources list
    pub fn sources_list(&self) -> PathBuf {
        self.config_dir().join(SOURCES_LIST)
    }

    /// Checksum of `sources.list` when the caches were last consistent
    pub fn sources_list_checksum(&self) -> PathBuf {
        self.config_dir().join(SOURCES_LIST_CHECKSUM)
    }

    pub fn cache_id_file(&self) -> PathBuf {
        self.config_dir().join(CACHE_ID)
    }

    pub fn arch_file(&self) -> PathBuf {
        self.config_dir().join(ARCH)
    }

    pub fn archives_dir(&self) -> PathBuf {
        self.base.join(ARCHIVES_DIR)
    }

    /// Working directory for in-progress downloads
    pub fn partial_dir(&self) -> PathBuf {
        self.archives_dir().join(PARTIAL_DIR)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.base.join(LOCK_FILE)
    }

    /// Directories whose presence means the arena was initialized
    pub fn state_dirs(&self) -> [PathBuf; 2] {
        [self.config_dir(), self.archives_dir()]
    }
}
