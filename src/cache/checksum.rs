//! Content checksums for change detection

use crate::error::{ChankoError, ChankoResult};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;

/// SHA256 of `bytes` as lowercase hex
pub fn checksum_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Checksum a file's contents
///
/// Fails if the file does not exist or cannot be read.
pub async fn file_checksum(path: &Path) -> ChankoResult<String> {
    let contents = fs::read(path).await.map_err(|e| ChankoError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;

    Ok(checksum_bytes(&contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn checksum_deterministic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sources.list");
        std::fs::write(&path, "deb http://archive.ubuntu.com/ubuntu noble main\n").unwrap();

        let first = file_checksum(&path).await.unwrap();
        let second = file_checksum(&path).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[tokio::test]
    async fn checksum_changes_with_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sources.list");

        std::fs::write(&path, "deb http://a.example/debian stable main\n").unwrap();
        let before = file_checksum(&path).await.unwrap();
        std::fs::write(&path, "deb http://b.example/debian stable main\n").unwrap();
        let after = file_checksum(&path).await.unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn checksum_known_value() {
        assert_eq!(
            checksum_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[tokio::test]
    async fn checksum_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = file_checksum(&dir.path().join("missing")).await.unwrap_err();
        assert!(matches!(err, ChankoError::Io { .. }));
    }
}
