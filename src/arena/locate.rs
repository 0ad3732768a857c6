//! Arena discovery
//!
//! A directory belongs to an arena when it, or one of its ancestors, is
//! named `arena.union`. Like a VCS root, the arena can be reached from
//! any directory nested inside it.

use crate::arena::path::resolve_path;
use crate::error::{ChankoError, ChankoResult};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name that marks an arena
pub const ARENA_MARKER: &str = "arena.union";

/// Result of walking up from a directory looking for the arena marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaLocation {
    /// The nearest ancestor (or the directory itself) named `arena.union`
    Found(PathBuf),
    /// The filesystem root was reached without a match
    NotFound,
}

impl ArenaLocation {
    /// Whether a marker was found
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Walk from `path` up to the filesystem root looking for the marker.
///
/// `path` is used as given; callers pass an already resolved path. The
/// root has no file name, so it never matches.
pub fn locate(path: &Path) -> ArenaLocation {
    path.ancestors()
        .find(|dir| dir.file_name().is_some_and(|name| name == ARENA_MARKER))
        .map_or(ArenaLocation::NotFound, |dir| {
            ArenaLocation::Found(dir.to_path_buf())
        })
}

/// Check whether `path` is, or is inside, an arena
pub fn is_arena(path: &Path) -> bool {
    resolve_path(path).is_ok_and(|resolved| locate(&resolved).is_found())
}

/// A validated arena base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaRoot {
    /// The path as supplied by the caller, before resolution
    nominal: PathBuf,
    /// Resolved base directory; all arena state lives below it
    base: PathBuf,
    /// The `arena.union` directory at or above `base`
    marker: PathBuf,
}

impl ArenaRoot {
    /// Resolve `path` and verify it lies inside an arena
    pub fn resolve(path: &Path) -> ChankoResult<Self> {
        let base = resolve_path(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ChankoError::NotAnArena {
                path: path.to_path_buf(),
            },
            _ => ChankoError::io(format!("resolving {}", path.display()), e),
        })?;

        match locate(&base) {
            ArenaLocation::Found(marker) => {
                debug!(
                    "Arena base {} (marker {})",
                    base.display(),
                    marker.display()
                );
                Ok(Self {
                    nominal: path.to_path_buf(),
                    base,
                    marker,
                })
            }
            ArenaLocation::NotFound => Err(ChankoError::NotAnArena { path: base }),
        }
    }

    /// The unresolved path the arena was reached through
    pub fn nominal(&self) -> &Path {
        &self.nominal
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn marker(&self) -> &Path {
        &self.marker
    }
}
