//! Advisory arena lock
//!
//! Chanko does not coordinate concurrent processes by default: two
//! activations of one arena can race on `sources.list.md5` and `cache_id`
//! and both refresh the remote cache. With `arena.lock` enabled, `create`
//! and `open` hold an exclusive lock on `<base>/.chanko.lock` for their
//! whole duration.

use crate::arena::ArenaLayout;
use crate::error::{ChankoError, ChankoResult};
use fs4::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Held lock; released when dropped
#[derive(Debug)]
pub struct ArenaLock {
    file: File,
    path: PathBuf,
}

impl ArenaLock {
    /// Try to take the lock without waiting
    ///
    /// Fails with `ArenaLocked` if another handle holds it.
    pub fn acquire(layout: &ArenaLayout) -> ChankoResult<Self> {
        let path = layout.lock_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ChankoError::io(format!("creating {}", parent.display()), e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| ChankoError::io(format!("opening lock {}", path.display()), e))?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!("Acquired arena lock {}", path.display());
                Ok(Self { file, path })
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Err(ChankoError::ArenaLocked(path)),
            #[cfg(windows)]
            Err(e) if matches!(e.raw_os_error(), Some(32 | 33)) => {
                Err(ChankoError::ArenaLocked(path))
            }
            Err(e) => Err(ChankoError::io(format!("locking {}", path.display()), e)),
        }
    }

    /// Take the lock only when enabled
    pub fn acquire_if(enabled: bool, layout: &ArenaLayout) -> ChankoResult<Option<Self>> {
        if enabled {
            Self::acquire(layout).map(Some)
        } else {
            debug!("Arena locking disabled; concurrent activations are not coordinated");
            Ok(None)
        }
    }
}

impl Drop for ArenaLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release arena lock {}: {}", self.path.display(), e);
        }
    }
}
