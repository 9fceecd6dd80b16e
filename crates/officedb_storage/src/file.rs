//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// A file-based whole-file backend.
///
/// # Durability
///
/// `write` never modifies the target file in place. The new image goes to
/// a uniquely named sibling, is synced with `File::sync_all()`, and is then
/// renamed over the target. On Unix the parent directory is synced after
/// the rename so the new name is durable too.
///
/// Once the rename has succeeded the write counts as done: readers already
/// see the new image, so a failed directory sync is logged and `write`
/// still returns `Ok`.
///
/// # Example
///
/// ```no_run
/// use officedb_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("Articles.xml")).unwrap();
/// backend.write(b"<Articles/>").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Opens a file backend at the given path.
    ///
    /// The file itself is not created until the first `write`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory does not exist.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("directory does not exist: {}", parent.display()),
                )
                .into());
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Opens a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path
            .with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
    }

    #[cfg(unix)]
    fn sync_parent(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            File::open(parent)?.sync_all()?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> StorageResult<()> {
        // NTFS journals the rename
        Ok(())
    }

    fn settle(&self, dir_sync: StorageResult<()>) {
        if let Err(e) = dir_sync {
            warn!(
                path = %self.path.display(),
                error = %e,
                "file replaced but directory sync failed"
            );
        }
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        let temp_path = self.temp_path();

        let result = (|| -> StorageResult<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
            drop(file);
            fs::rename(&temp_path, &self.path)?;
            Ok(())
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        self.settle(self.sync_parent());
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use tempfile::tempdir;

    #[test]
    fn open_does_not_create_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Articles.xml");

        let backend = FileBackend::open(&path).unwrap();
        assert!(!backend.exists());
        assert!(backend.read().unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn failed_directory_sync_keeps_the_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Articles.xml");
        let mut backend = FileBackend::open(&path).unwrap();
        backend.write(b"<Articles/>").unwrap();

        backend.settle(Err(std::io::Error::other("sync refused").into()));
        backend.settle(Ok(()));
        assert_eq!(backend.read().unwrap().unwrap(), b"<Articles/>");
    }

    #[test]
    fn open_fails_without_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("Articles.xml");

        let result = FileBackend::open(&path);
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[test]
    fn write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Articles.xml");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.write(b"<Articles/>").unwrap();

        assert!(backend.exists());
        assert_eq!(backend.read().unwrap().unwrap(), b"<Articles/>");
    }

    #[test]
    fn write_replaces_whole_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Articles.xml");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.write(b"a much longer first image").unwrap();
        backend.write(b"short").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"short");
    }

    #[test]
    fn write_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Customers.xml");

        let mut backend = FileBackend::open(&path).unwrap();
        for i in 0..5 {
            backend.write(format!("image {i}").as_bytes()).unwrap();
        }

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("Customers.xml")]);
    }

    #[test]
    fn persistence_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Others.xml");

        {
            let mut backend = FileBackend::open(&path).unwrap();
            backend.write(b"<Settings/>").unwrap();
        }

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.read_string().unwrap().unwrap(), "<Settings/>");
    }

    #[test]
    fn read_string_rejects_binary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.xml");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let backend = FileBackend::open(&path).unwrap();
        assert!(matches!(
            backend.read_string(),
            Err(StorageError::InvalidUtf8 { .. })
        ));
    }

    #[test]
    fn create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ACME").join("Articles.xml");

        let mut backend = FileBackend::open_with_create_dirs(&path).unwrap();
        backend.write(b"x").unwrap();
        assert!(path.exists());
        assert_eq!(backend.path(), path);
    }
}
