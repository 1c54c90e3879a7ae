//! Config file access.
//!
//! The engine reads and rewrites configs through [`ConfigStore`] so tests
//! and embedders can substitute their own storage.

use std::io;
use std::path::Path;

/// Read/write access to config files.
pub trait ConfigStore {
    /// Read the whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the file's contents.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// [`ConfigStore`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl ConfigStore for FsStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_store_round_trips_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.book.yml");
        FsStore.write(&path, "name: A\n").unwrap();
        assert_eq!(FsStore.read(&path).unwrap(), b"name: A\n");
    }

    #[test]
    fn fs_store_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsStore
            .read(&dir.path().join("missing.book.yml"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
