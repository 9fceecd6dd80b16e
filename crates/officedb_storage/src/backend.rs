//! Storage backend trait definition.

use crate::error::{StorageError, StorageResult};

/// A whole-file storage backend.
///
/// A backend holds at most one image: the bytes passed to the last
/// successful [`write`](StorageBackend::write). officedb owns all
/// interpretation of those bytes.
///
/// # Invariants
///
/// - `read` returns `None` until the first successful `write`
/// - after `write` returns `Ok`, `read` returns exactly the written bytes,
///   including after a process restart for durable backends
/// - a failed `write` leaves the previous image intact
/// - backends must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the current image, or `None` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if the image exists but cannot be read.
    fn read(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the stored image with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the new image could not be made durable. The
    /// previous image is left in place in that case.
    fn write(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns true if an image is present.
    fn exists(&self) -> bool;

    /// Human readable description of where the image lives.
    fn location(&self) -> String;

    /// Reads the current image as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidUtf8`] if the image is not text.
    fn read_string(&self) -> StorageResult<Option<String>> {
        match self.read()? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| StorageError::InvalidUtf8 {
                    location: self.location(),
                }),
            None => Ok(None),
        }
    }
}
