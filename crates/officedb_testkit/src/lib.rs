//! # officedb Testkit
//!
//! Test utilities for officedb.
//!
//! This crate provides:
//! - Temporary data roots with an active company
//! - A sample extension record type
//! - Property-based test generators using proptest
//! - Multi-threaded stress helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use officedb_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     with_ready_store(|db| {
//!         db.save_article(&Article::new("1000", "Widget")).unwrap();
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
