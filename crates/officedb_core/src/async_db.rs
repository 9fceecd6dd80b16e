//! Async facade over [`Database`].
//!
//! Every call runs the synchronous operation on tokio's blocking pool, so a
//! caller on an async runtime never blocks its executor on file I/O or on
//! the collection locks. There is no cancellation: once dispatched, an
//! operation runs to completion even if the returned future is dropped.

use crate::database::Database;
use crate::enrichment::DocumentParser;
use crate::error::{CoreError, CoreResult};
use crate::extension::ExtensionKind;
use crate::models::{
    Article, ArticlePreview, Customer, CustomerPreview, Document, DocumentPreview, SettingsBlob,
};
use crate::tenant::CompanyInfo;
use crate::types::StoreState;
use crate::NamedRecord;
use chrono::NaiveDate;
use std::sync::Arc;

/// Cloneable async handle sharing one [`Database`].
#[derive(Debug, Clone)]
pub struct AsyncDatabase {
    inner: Arc<Database>,
}

impl AsyncDatabase {
    /// Wraps a database.
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(db),
        }
    }

    /// Wraps an already shared database.
    pub fn from_arc(inner: Arc<Database>) -> Self {
        Self { inner }
    }

    /// The wrapped database, for synchronous calls.
    pub fn database(&self) -> &Arc<Database> {
        &self.inner
    }

    /// Lifecycle state. Does not touch the disk.
    pub fn state(&self) -> StoreState {
        self.inner.state()
    }

    async fn run<R, F>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&Database) -> CoreResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| CoreError::TaskFailed {
                message: e.to_string(),
            })?
    }

    /// See [`Database::connect`].
    pub async fn connect(&self) -> CoreResult<bool> {
        self.run(Database::connect).await
    }

    /// See [`Database::list_companies`].
    pub async fn list_companies(&self) -> CoreResult<Vec<CompanyInfo>> {
        self.run(Database::list_companies).await
    }

    /// See [`Database::add_company`].
    pub async fn add_company(&self, info: CompanyInfo) -> CoreResult<()> {
        self.run(move |db| db.add_company(&info)).await
    }

    /// See [`Database::switch_company`].
    pub async fn switch_company(&self, info: CompanyInfo) -> CoreResult<bool> {
        self.run(move |db| db.switch_company(&info)).await
    }

    /// See [`Database::article`].
    pub async fn article(&self, id: String) -> CoreResult<Option<Article>> {
        self.run(move |db| db.article(&id)).await
    }

    /// See [`Database::articles`].
    pub async fn articles(&self) -> CoreResult<Vec<ArticlePreview>> {
        self.run(Database::articles).await
    }

    /// See [`Database::save_article`].
    pub async fn save_article(&self, article: Article) -> CoreResult<()> {
        self.run(move |db| db.save_article(&article)).await
    }

    /// See [`Database::save_articles`].
    pub async fn save_articles(&self, articles: Vec<Article>) -> CoreResult<usize> {
        self.run(move |db| db.save_articles(&articles)).await
    }

    /// See [`Database::article_exists`].
    pub async fn article_exists(&self, id: String) -> CoreResult<bool> {
        self.run(move |db| db.article_exists(&id)).await
    }

    /// See [`Database::next_article_id`].
    pub async fn next_article_id(&self) -> CoreResult<u64> {
        self.run(Database::next_article_id).await
    }

    /// See [`Database::customer`].
    pub async fn customer(&self, id: String) -> CoreResult<Option<Customer>> {
        self.run(move |db| db.customer(&id)).await
    }

    /// See [`Database::customers`].
    pub async fn customers(&self) -> CoreResult<Vec<CustomerPreview>> {
        self.run(Database::customers).await
    }

    /// See [`Database::save_customer`].
    pub async fn save_customer(&self, customer: Customer) -> CoreResult<()> {
        self.run(move |db| db.save_customer(&customer)).await
    }

    /// See [`Database::customer_exists`].
    pub async fn customer_exists(&self, id: String) -> CoreResult<bool> {
        self.run(move |db| db.customer_exists(&id)).await
    }

    /// See [`Database::next_customer_id`].
    pub async fn next_customer_id(&self) -> CoreResult<u64> {
        self.run(Database::next_customer_id).await
    }

    /// See [`Database::document`].
    pub async fn document(&self, document_type: String, id: String) -> CoreResult<Option<Document>> {
        self.run(move |db| db.document(&document_type, &id)).await
    }

    /// See [`Database::documents_in_interval`].
    pub async fn documents_in_interval(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        document_type: Option<String>,
    ) -> CoreResult<Vec<DocumentPreview>> {
        self.run(move |db| db.documents_in_interval(start, end, document_type.as_deref()))
            .await
    }

    /// See [`Database::save_document`].
    pub async fn save_document(&self, document: Document) -> CoreResult<()> {
        self.run(move |db| db.save_document(&document)).await
    }

    /// See [`Database::document_exists`].
    pub async fn document_exists(&self, document_type: String, id: String) -> CoreResult<bool> {
        self.run(move |db| db.document_exists(&document_type, &id))
            .await
    }

    /// See [`Database::next_document_id`].
    pub async fn next_document_id(&self, document_type: String) -> CoreResult<u64> {
        self.run(move |db| db.next_document_id(&document_type)).await
    }

    /// See [`Database::settings`].
    pub async fn settings(&self) -> CoreResult<SettingsBlob> {
        self.run(Database::settings).await
    }

    /// See [`Database::save_settings`].
    pub async fn save_settings(&self, settings: SettingsBlob) -> CoreResult<()> {
        self.run(move |db| db.save_settings(&settings)).await
    }

    /// See [`Database::register_extension_kind`].
    pub async fn register_extension_kind(
        &self,
        kind: ExtensionKind,
        persist: bool,
    ) -> CoreResult<bool> {
        self.run(move |db| db.register_extension_kind(&kind, persist))
            .await
    }

    /// See [`Database::save_extension`].
    pub async fn save_extension<T>(&self, record: T) -> CoreResult<bool>
    where
        T: NamedRecord + Send + 'static,
    {
        self.run(move |db| db.save_extension(&record)).await
    }

    /// See [`Database::get_extension`].
    pub async fn get_extension<T>(&self, id: String) -> CoreResult<Option<T>>
    where
        T: NamedRecord + Send + 'static,
    {
        self.run(move |db| db.get_extension::<T>(&id)).await
    }

    /// See [`Database::extension_exists`].
    pub async fn extension_exists<T>(&self, id: String) -> CoreResult<bool>
    where
        T: NamedRecord + Send + 'static,
    {
        self.run(move |db| db.extension_exists::<T>(&id)).await
    }

    /// Registers a parser. Does not touch the disk.
    pub fn register_document_parser(&self, parser: Arc<dyn DocumentParser>) {
        self.inner.register_document_parser(parser);
    }

    /// See [`Database::update_reserved_article_id`].
    pub fn update_reserved_article_id(&self, old: &str, new: &str) {
        self.inner.update_reserved_article_id(old, new);
    }

    /// See [`Database::update_reserved_customer_id`].
    pub fn update_reserved_customer_id(&self, old: &str, new: &str) {
        self.inner.update_reserved_customer_id(old, new);
    }

    /// See [`Database::update_reserved_document_id`].
    pub fn update_reserved_document_id(&self, document_type: &str, old: &str, new: &str) {
        self.inner
            .update_reserved_document_id(document_type, old, new);
    }
}

impl From<Database> for AsyncDatabase {
    fn from(db: Database) -> Self {
        Self::new(db)
    }
}
