//! sources.list change detection
//!
//! The remote cache is built from `config/sources.list`. Its checksum at
//! the last consistent point is stored in `config/sources.list.md5`:
//!
//! | Stored vs current | State | Action |
//! |-------------------|-------|--------|
//! | equal | Consistent | none |
//! | different or missing | Stale | refresh remote cache, then store current |
//!
//! A failed refresh leaves the stored checksum untouched, so the next
//! activation sees the same stale state and retries.

use crate::arena::ArenaLayout;
use crate::cache::{file_checksum, Cache};
use crate::error::{ChankoError, ChankoResult};
use std::io;
use tokio::fs;
use tracing::{debug, info};

/// Outcome of a change check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Stored checksum matched; nothing was done
    Consistent,
    /// Sources changed and the remote cache was refreshed
    Refreshed,
}

impl Freshness {
    pub fn refreshed(self) -> bool {
        matches!(self, Self::Refreshed)
    }
}

/// Compares the stored and current sources.list checksums
pub struct ChangeDetector<'a> {
    layout: &'a ArenaLayout,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(layout: &'a ArenaLayout) -> Self {
        Self { layout }
    }

    /// Checksum of the sources list as it is now
    pub async fn current_checksum(&self) -> ChankoResult<String> {
        file_checksum(&self.layout.sources_list()).await
    }

    /// Checksum stored at the last consistent point
    ///
    /// An absent file yields an empty string: never checksummed counts as stale.
    pub async fn expected_checksum(&self) -> ChankoResult<String> {
        let path = self.layout.sources_list_checksum();
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(content.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(ChankoError::io(format!("reading {}", path.display()), e)),
        }
    }

    /// Whether the remote cache is out of date, without refreshing it
    pub async fn is_stale(&self) -> ChankoResult<bool> {
        Ok(self.current_checksum().await? != self.expected_checksum().await?)
    }

    /// Run the check once, refreshing `remote` when the sources changed
    pub async fn run(&self, remote: &dyn Cache) -> ChankoResult<Freshness> {
        let current = self.current_checksum().await?;
        let expected = self.expected_checksum().await?;

        if current == expected {
            debug!("sources.list unchanged ({})", current);
            return Ok(Freshness::Consistent);
        }

        if expected.is_empty() {
            info!("No stored sources.list checksum, refreshing {} cache", remote.kind());
        } else {
            info!("sources.list changed, refreshing {} cache", remote.kind());
        }

        remote
            .refresh()
            .await
            .map_err(|e| ChankoError::refresh_failed(remote.kind(), e))?;

        self.record(&current).await?;
        Ok(Freshness::Refreshed)
    }

    /// Store `checksum` as the consistent point
    pub async fn record(&self, checksum: &str) -> ChankoResult<()> {
        let path = self.layout.sources_list_checksum();
        fs::write(&path, checksum)
            .await
            .map_err(|e| ChankoError::io(format!("writing {}", path.display()), e))?;

        debug!("Recorded sources.list checksum {}", checksum);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::RecordingCache;
    use crate::cache::{checksum_bytes, CacheKind};
    use std::fs as stdfs;
    use tempfile::TempDir;

    const SOURCES: &str = "deb http://deb.debian.org/debian bookworm main\n";

    fn arena(sources: &str, stored: Option<&str>) -> (TempDir, ArenaLayout) {
        let temp = TempDir::new().unwrap();
        let layout = ArenaLayout::new(temp.path());
        stdfs::create_dir_all(layout.config_dir()).unwrap();
        stdfs::write(layout.sources_list(), sources).unwrap();
        if let Some(stored) = stored {
            stdfs::write(layout.sources_list_checksum(), stored).unwrap();
        }
        (temp, layout)
    }

    #[tokio::test]
    async fn consistent_does_nothing() {
        let checksum = checksum_bytes(SOURCES.as_bytes());
        let (_temp, layout) = arena(SOURCES, Some(checksum.as_str()));
        let remote = RecordingCache::new(CacheKind::Remote);

        let outcome = ChangeDetector::new(&layout).run(&remote).await.unwrap();

        assert_eq!(outcome, Freshness::Consistent);
        assert_eq!(remote.refreshes(), 0);
    }

    #[tokio::test]
    async fn stored_checksum_is_trimmed() {
        let checksum = format!("{}\n", checksum_bytes(SOURCES.as_bytes()));
        let (_temp, layout) = arena(SOURCES, Some(checksum.as_str()));

        assert!(!ChangeDetector::new(&layout).is_stale().await.unwrap());
    }

    #[tokio::test]
    async fn changed_sources_refresh_once() {
        let (_temp, layout) = arena(SOURCES, Some("0000"));
        let remote = RecordingCache::new(CacheKind::Remote);
        let detector = ChangeDetector::new(&layout);

        assert_eq!(detector.run(&remote).await.unwrap(), Freshness::Refreshed);
        assert_eq!(remote.refreshes(), 1);
        assert_eq!(
            detector.expected_checksum().await.unwrap(),
            checksum_bytes(SOURCES.as_bytes())
        );

        // Second run is consistent again
        assert_eq!(detector.run(&remote).await.unwrap(), Freshness::Consistent);
        assert_eq!(remote.refreshes(), 1);
    }

    #[tokio::test]
    async fn missing_checksum_counts_as_stale() {
        let (_temp, layout) = arena(SOURCES, None);
        let remote = RecordingCache::new(CacheKind::Remote);
        let detector = ChangeDetector::new(&layout);

        assert_eq!(detector.expected_checksum().await.unwrap(), "");
        assert!(detector.is_stale().await.unwrap());
        assert!(detector.run(&remote).await.unwrap().refreshed());
        assert_eq!(remote.refreshes(), 1);
        assert!(layout.sources_list_checksum().exists());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_stale_checksum() {
        let (_temp, layout) = arena(SOURCES, Some("0000"));
        let remote = RecordingCache::failing(CacheKind::Remote);

        let err = ChangeDetector::new(&layout).run(&remote).await.unwrap_err();

        assert!(matches!(
            err,
            ChankoError::RefreshFailed {
                kind: CacheKind::Remote,
                ..
            }
        ));
        assert_eq!(
            stdfs::read_to_string(layout.sources_list_checksum()).unwrap(),
            "0000"
        );
    }

    #[tokio::test]
    async fn missing_sources_list_is_an_error() {
        let temp = TempDir::new().unwrap();
        let layout = ArenaLayout::new(temp.path());
        let remote = RecordingCache::new(CacheKind::Remote);

        let err = ChangeDetector::new(&layout).run(&remote).await.unwrap_err();
        assert!(matches!(err, ChankoError::Io { .. }));
        assert_eq!(remote.refreshes(), 0);
    }
}
