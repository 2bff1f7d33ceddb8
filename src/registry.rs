//! The set of open monitored files and how far each has been read

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use crate::error::FileOpenError;

/// An open file and the byte offset up to which it has been consumed
#[derive(Debug)]
pub struct MonitoredFile {
    path: PathBuf,
    offset: u64,
    handle: File,
}

impl MonitoredFile {
    /// Open `path` and start at its current end; older content is never read
    pub fn open(path: &Path) -> Result<Self, FileOpenError> {
        let to_error = |source| FileOpenError {
            path: path.to_path_buf(),
            source,
        };
        let handle = File::open(path).map_err(to_error)?;
        let metadata = handle.metadata().map_err(to_error)?;
        if !metadata.is_file() {
            return Err(to_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        let offset = metadata.len();

        Ok(Self {
            path: path.to_path_buf(),
            offset,
            handle,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn handle_mut(&mut self) -> &mut File {
        &mut self.handle
    }

    /// Offsets only move forward
    pub fn advance_to(&mut self, offset: u64) {
        self.offset = self.offset.max(offset);
    }
}

/// Monitored files keyed by path. Iteration is in lexicographic path order.
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: BTreeMap<PathBuf, MonitoredFile>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open every path. Failures are returned and logged, never fatal.
    pub fn register_all(&mut self, paths: &[PathBuf]) -> Vec<FileOpenError> {
        let mut failures = Vec::new();

        for path in paths {
            if self.files.contains_key(path) {
                continue;
            }
            match MonitoredFile::open(path) {
                Ok(file) => {
                    tracing::debug!("Monitoring {} from offset {}", path.display(), file.offset());
                    self.files.insert(path.clone(), file);
                }
                Err(err) => {
                    tracing::warn!("{}", err);
                    failures.push(err);
                }
            }
        }

        failures
    }

    /// Close every handle and forget all offsets
    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn get(&self, path: &Path) -> Option<&MonitoredFile> {
        self.files.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MonitoredFile> {
        self.files.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_offset_starts_at_file_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "existing line\n").unwrap();

        let file = MonitoredFile::open(&path).unwrap();

        assert_eq!(file.offset(), 14);
        assert_eq!(file.path(), path.as_path());
    }

    #[test]
    fn test_failures_are_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.log");
        fs::write(&good, "").unwrap();
        let missing = dir.path().join("missing.log");

        let mut registry = FileRegistry::new();
        let failures = registry.register_all(&[missing.clone(), good.clone()]);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, missing);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&good).is_some());
    }

    #[test]
    fn test_directory_is_not_a_monitored_file() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("logs");
        fs::create_dir(&logs).unwrap();

        let err = MonitoredFile::open(&logs).unwrap_err();
        assert_eq!(err.path, logs);
        assert_eq!(err.source.kind(), std::io::ErrorKind::InvalidInput);

        let mut registry = FileRegistry::new();
        let failures = registry.register_all(&[logs]);
        assert_eq!(failures.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_paths_are_sorted_and_deduplicated() {
        let dir = TempDir::new().unwrap();
        let b = dir.path().join("b.log");
        let a = dir.path().join("a.log");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        let mut registry = FileRegistry::new();
        registry.register_all(&[b.clone(), a.clone(), b.clone()]);

        let paths: Vec<&Path> = registry.paths().collect();
        assert_eq!(paths, vec![a.as_path(), b.as_path()]);
    }

    #[test]
    fn test_offset_never_moves_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "12345").unwrap();

        let mut file = MonitoredFile::open(&path).unwrap();
        file.advance_to(9);
        file.advance_to(3);

        assert_eq!(file.offset(), 9);
    }

    #[test]
    fn test_clear_releases_everything() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "").unwrap();

        let mut registry = FileRegistry::new();
        registry.register_all(&[path]);
        registry.clear();

        assert!(registry.is_empty());
    }
}
