//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Shared {
    data: RwLock<Option<Vec<u8>>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

/// An in-memory whole-file backend.
///
/// Clones share the same image, so a test can keep a handle to a backend
/// after handing it to a collection store and inspect what was written.
///
/// Write failures can be injected with [`set_fail_writes`](Self::set_fail_writes)
/// to exercise the write-failure path of callers.
///
/// # Example
///
/// ```rust
/// use officedb_storage::{StorageBackend, InMemoryBackend};
///
/// let backend = InMemoryBackend::new();
/// let mut handle = backend.clone();
/// handle.write(b"<Units/>").unwrap();
/// assert_eq!(backend.data().unwrap(), b"<Units/>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    shared: Arc<Shared>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with a pre-existing image.
    ///
    /// Useful for testing load of existing or corrupted files.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        let backend = Self::new();
        *backend.shared.data.write() = Some(data);
        backend
    }

    /// Returns a copy of the current image.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.shared.data.read().clone()
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.shared.writes.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `write` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.shared.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl StorageBackend for InMemoryBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.shared.data.read().clone())
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        if self.shared.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteRejected {
                location: self.location(),
            });
        }
        *self.shared.data.write() = Some(data.to_vec());
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self) -> bool {
        self.shared.data.read().is_some()
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
