//! # officedb Core
//!
//! Embedded multi-tenant record store.
//!
//! This crate provides:
//! - Collection stores: one file-backed element tree per collection
//! - Built-in records (articles, customers, documents, settings)
//! - Sequential id allocation with in-memory reservations
//! - Companies (tenants) with their own directory of collections
//! - Extension record kinds registered at runtime
//! - Document enrichment through external parsers
//! - An async facade running operations on a blocking pool

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod allocator;
#[cfg(feature = "async")]
mod async_db;
mod collection;
mod config;
mod database;
mod dir;
mod enrichment;
mod error;
mod extension;
pub mod models;
mod tenant;
mod types;
mod view;

pub use allocator::IdAllocator;
#[cfg(feature = "async")]
pub use async_db::AsyncDatabase;
pub use collection::{Collection, CollectionStore, NamedRecord, RecordCodec, RecordIter, RecordSpec};
pub use config::Config;
pub use database::{CollectionInfo, Database};
pub use dir::{DataDir, DirLock};
pub use enrichment::{DocumentParser, ParserResult};
pub use error::{CoreError, CoreResult};
pub use extension::ExtensionKind;
pub use models::{
    Address, Article, ArticlePreview, Customer, CustomerPreview, Document, DocumentPreview,
    FieldValue, Money, PaymentMethod, SettingsBlob, TaxClass, Unit,
};
pub use tenant::{validate_company_id, CompanyInfo};
pub use types::{IdScope, StoreState};
pub use view::StoreView;
