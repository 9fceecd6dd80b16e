//! Data root layout and locking.
//!
//! ```text
//! <root>/
//! ├─ Settings.xml          # current company
//! ├─ LOCK                  # advisory lock for single-process access
//! └─ <CompanyID>/
//!    ├─ Articles.xml
//!    ├─ Customers.xml
//!    ├─ Documents.xml
//!    ├─ Others.xml         # root element "Settings"
//!    └─ <Kind>s.xml        # one per extension kind
//! ```
//!
//! The LOCK file ensures only one process works on a data root at a time.

use crate::error::{CoreError, CoreResult};
use fs2::FileExt;
use officedb_storage::FileBackend;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = "LOCK";
const SETTINGS_FILE: &str = "Settings";

/// Paths inside a data root.
///
/// `DataDir` only computes paths and creates directories. Holding the
/// exclusive lock is a separate [`DirLock`].
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
    extension: String,
}

impl DataDir {
    /// Creates a layout for the given root and file extension.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// The data root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the path exists but is not a directory or
    /// cannot be created.
    pub fn ensure_root(&self) -> CoreResult<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        if !self.root.is_dir() {
            return Err(CoreError::storage_unavailable(
                SETTINGS_FILE,
                format!("path is not a directory: {}", self.root.display()),
            ));
        }
        Ok(())
    }

    /// Acquires the exclusive lock on the root.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DirectoryLocked`] if another process holds it.
    pub fn lock(&self) -> CoreResult<DirLock> {
        let lock_path = self.root.join(LOCK_FILE);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        if file.try_lock_exclusive().is_err() {
            return Err(CoreError::DirectoryLocked);
        }

        Ok(DirLock { _file: file })
    }

    /// File name of a collection, e.g. `Articles.xml`.
    #[must_use]
    pub fn file_name(&self, collection: &str) -> String {
        format!("{collection}.{}", self.extension)
    }

    /// Path of the root settings file.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.root.join(self.file_name(SETTINGS_FILE))
    }

    /// Settings file backend.
    pub fn settings_backend(&self) -> CoreResult<FileBackend> {
        Ok(FileBackend::open(&self.settings_path())?)
    }

    /// Directory of one company.
    #[must_use]
    pub fn company_dir(&self, company_id: &str) -> PathBuf {
        self.root.join(company_id)
    }

    /// Path of a collection file of one company.
    #[must_use]
    pub fn collection_path(&self, company_id: &str, collection: &str) -> PathBuf {
        self.company_dir(company_id).join(self.file_name(collection))
    }

    /// Opens the backend of a collection, creating the company directory
    /// if needed.
    pub fn collection_backend(&self, company_id: &str, collection: &str) -> CoreResult<FileBackend> {
        Ok(FileBackend::open_with_create_dirs(
            &self.collection_path(company_id, collection),
        )?)
    }

    /// Immediate sub-directories of the root.
    ///
    /// A missing root yields an empty list.
    pub fn company_dirs(&self) -> CoreResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(entry.path());
            }
        }
        Ok(dirs)
    }
}

/// Exclusive advisory lock on a data root, released on drop.
#[derive(Debug)]
pub struct DirLock {
    _file: File,
}
