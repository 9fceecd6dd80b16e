//! CLI command implementations.

pub mod companies;
pub mod inspect;
pub mod records;

use clap::ValueEnum;
use officedb_core::{Config, Database};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Output format of listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable table.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Collections with their own id sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdTarget {
    /// Articles.
    Article,
    /// Customers.
    Customer,
    /// Documents of one type.
    Document,
}

/// Errors raised by the CLI itself.
#[derive(Debug, Error)]
pub enum CliError {
    /// No `--path` given.
    #[error("data root path required (--path)")]
    MissingPath,

    /// The root has no current company.
    #[error("no current company at {0}; run `officedb switch <ID>` first")]
    NoCompany(String),

    /// A metadata argument is not `KEY=VALUE`.
    #[error("invalid metadata entry {0:?}, expected KEY=VALUE")]
    InvalidMetadata(String),

    /// `next-id document` without `--type`.
    #[error("--type is required for document ids")]
    MissingDocumentType,

    /// Unknown company id.
    #[error("no such company: {0}")]
    UnknownCompany(String),
}

/// Opens a root for reading.
///
/// Read-only commands do not take the directory lock, so they work while
/// an application holds the root.
pub fn open_shared(path: &Path) -> Result<Database, Box<dyn std::error::Error>> {
    Ok(Database::open_with_config(
        path,
        Config::new().lock_directory(false),
    )?)
}

/// Opens a root for reading and requires a current company.
pub fn open_ready(path: &Path) -> Result<Database, Box<dyn std::error::Error>> {
    let db = open_shared(path)?;
    if db.current_company().is_none() {
        return Err(CliError::NoCompany(path.display().to_string()).into());
    }
    Ok(db)
}

/// Opens a root for changes, holding the directory lock.
pub fn open_exclusive(path: &Path) -> Result<Database, Box<dyn std::error::Error>> {
    Ok(Database::open(path)?)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
