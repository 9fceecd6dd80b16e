//! # officedb Storage
//!
//! Whole-file storage backends for officedb.
//!
//! Every collection in officedb is persisted as a single file that is
//! rewritten in full on each change. Backends in this crate are **opaque
//! byte stores**: they hand back the last complete image written and never
//! interpret it.
//!
//! ## Design Principles
//!
//! - A write replaces the entire contents; readers never see a partial image
//! - No knowledge of the XML encoding or of records
//! - Must be `Send + Sync` so collection stores can be shared across threads
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral stores
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use officedb_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.read().unwrap().is_none());
//! backend.write(b"<Articles/>").unwrap();
//! assert_eq!(backend.read().unwrap().as_deref(), Some(&b"<Articles/>"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
