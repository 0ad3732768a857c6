//! Symlink-preserving path resolution
//!
//! An arena is often entered through a symlink. Resolving that last link
//! would move the arena base to the link target, so only the ancestors of
//! the final component are canonicalized.

use std::ffi::OsStr;
use std::io;
use std::path::{absolute, is_separator, Path, PathBuf};

/// Resolve `path` to an absolute canonical path without following a
/// symlink at its final component.
///
/// All ancestor components are canonicalized. When the final component is
/// empty (trailing separator), `.` or `..`, the whole path is canonicalized.
pub fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Path::new(".").canonicalize();
    }

    if let Some(name) = final_component(path) {
        let full = absolute(path)?;
        if let Some(parent) = full.parent() {
            return Ok(parent.canonicalize()?.join(name));
        }
    }

    path.canonicalize()
}

/// The raw final component of `path`, unless it is empty, `.` or `..`.
///
/// `Path::file_name` normalizes trailing `.` and separators away, so the
/// raw bytes are inspected instead.
fn final_component(path: &Path) -> Option<&OsStr> {
    let bytes = path.as_os_str().as_encoded_bytes();
    let start = bytes
        .iter()
        .rposition(|b| is_separator(char::from(*b)))
        .map_or(0, |i| i + 1);

    match &bytes[start..] {
        b"" | b"." | b".." => None,
        _ => path.file_name(),
    }
}
