//! Database facade.

use crate::allocator::IdAllocator;
use crate::collection::{Collection, CollectionStore, NamedRecord, RecordCodec, RecordIter};
use crate::config::Config;
use crate::dir::{DataDir, DirLock};
use crate::enrichment::{DocumentParser, EnrichmentPipeline};
use crate::error::{CoreError, CoreResult};
use crate::extension::{durable_kinds, is_xml_name, persist_kind, ExtensionKind, ExtensionRegistry};
use crate::models::{
    document_spec, Article, ArticlePreview, Customer, CustomerPreview, Document, DocumentPreview,
    PaymentMethod, SettingsBlob, TaxClass, Unit,
};
use crate::tenant::{validate_company_id, CompanyInfo, TenantDirectory, TenantStores};
use crate::types::{IdScope, StoreState};
use crate::view::StoreView;
use chrono::NaiveDate;
use officedb_codec::Element;
use parking_lot::RwLock;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Lifecycle state guarded by the tenant lock.
struct Shared {
    state: StoreState,
    tenant: Option<TenantStores>,
    lock: Option<DirLock>,
}

/// Summary of one open collection of the active company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    /// Collection name.
    pub name: String,
    /// Where the collection is persisted.
    pub location: String,
    /// Number of elements directly below the root.
    pub entries: usize,
}

/// The main database handle.
///
/// `Database` is the entry point for interacting with an officedb data
/// root. It provides:
/// - Company management (list, add, switch)
/// - Articles, customers, documents and settings of the active company
/// - Extension record kinds
/// - Document enrichment
/// - Identifier allocation with reservations
///
/// # Lifecycle
///
/// A new handle is [`StoreState::Uninitialized`]. [`connect`](Self::connect)
/// moves it to `FirstRun` (no current company yet), `Ready`, or `Failed`.
/// Record operations need `Ready` and fail with [`CoreError::NotReady`]
/// otherwise. Company operations work in every state.
///
/// ```rust,ignore
/// use officedb_core::{CompanyInfo, Database};
///
/// let db = Database::open("data")?;
/// if !db.state().is_ready() {
///     let acme = CompanyInfo::new("ACME", "ACME Corp.");
///     db.add_company(&acme)?;
///     db.switch_company(&acme)?;
/// }
/// let next = db.next_article_id()?;
/// ```
///
/// # Locking
///
/// Record operations share a read lock on the active company and then take
/// the mutex of the collection they touch. `connect` and `switch_company`
/// take the write lock, so they wait for running operations and block new
/// ones until the company is replaced. Enrichment parsers run under the
/// read lock and must not call back into the `Database`.
pub struct Database {
    config: Config,
    tenants: TenantDirectory,
    shared: RwLock<Shared>,
    allocator: IdAllocator,
    kinds: ExtensionRegistry,
    pipeline: EnrichmentPipeline,
}

impl Database {
    /// Creates an unconnected handle. Nothing is read or written.
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        let dir = DataDir::new(root, config.file_extension.clone());
        Self {
            allocator: IdAllocator::new(config.first_id),
            tenants: TenantDirectory::new(dir),
            shared: RwLock::new(Shared {
                state: StoreState::Uninitialized,
                tenant: None,
                lock: None,
            }),
            kinds: ExtensionRegistry::default(),
            pipeline: EnrichmentPipeline::default(),
            config,
        }
    }

    /// Opens a data root with the default configuration and connects.
    ///
    /// A root without a current company opens in `FirstRun`; that is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns the error of [`connect`](Self::connect).
    pub fn open(root: impl Into<PathBuf>) -> CoreResult<Self> {
        Self::open_with_config(root, Config::default())
    }

    /// Opens a data root with a custom configuration and connects.
    pub fn open_with_config(root: impl Into<PathBuf>, config: Config) -> CoreResult<Self> {
        let db = Self::new(root, config);
        db.connect()?;
        Ok(db)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the data root.
    pub fn root(&self) -> &Path {
        self.tenants.dir().root()
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> StoreState {
        self.shared.read().state
    }

    /// Returns the identifier allocator.
    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    /// The active company, if any.
    pub fn current_company(&self) -> Option<CompanyInfo> {
        self.shared.read().tenant.as_ref().map(|t| t.company.clone())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Loads the current company named in the root settings file.
    ///
    /// Returns `true` when a company is active (`Ready`) and `false` on a
    /// first run. Previously registered extension kinds are reopened for
    /// the company; an extension collection that cannot be opened is logged
    /// and left out.
    ///
    /// # Errors
    ///
    /// Any failure to create the root, lock it, parse the settings file, or
    /// open a built-in collection leaves the store `Failed`.
    pub fn connect(&self) -> CoreResult<bool> {
        let mut shared = self.shared.write();
        self.connect_locked(&mut shared)
    }

    fn connect_locked(&self, shared: &mut Shared) -> CoreResult<bool> {
        let start = Instant::now();
        shared.tenant = None;

        match self.load_current(shared) {
            Ok(Some(stores)) => {
                info!(
                    company = %stores.company.company_id,
                    extensions = stores.extension_names().len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "connected"
                );
                shared.tenant = Some(stores);
                shared.state = StoreState::Ready;
                Ok(true)
            }
            Ok(None) => {
                info!(root = %self.root().display(), "no current company, first run");
                shared.state = StoreState::FirstRun;
                Ok(false)
            }
            Err(e) => {
                error!(root = %self.root().display(), error = %e, "connect failed");
                shared.state = StoreState::Failed;
                Err(e)
            }
        }
    }

    fn load_current(&self, shared: &mut Shared) -> CoreResult<Option<TenantStores>> {
        self.acquire_lock(shared)?;
        let Some(company) = self.tenants.current_company()? else {
            return Ok(None);
        };
        let stores = TenantStores::open(self.tenants.dir(), company)?;
        self.replay_extensions(&stores);
        Ok(Some(stores))
    }

    fn acquire_lock(&self, shared: &mut Shared) -> CoreResult<()> {
        self.tenants.dir().ensure_root()?;
        if self.config.lock_directory && shared.lock.is_none() {
            shared.lock = Some(self.tenants.dir().lock()?);
        }
        Ok(())
    }

    fn replay_extensions(&self, stores: &TenantStores) {
        let mut kinds = self.kinds.all();
        for kind in durable_kinds(&stores.others) {
            if !kinds.iter().any(|k| k.element_name() == kind.element_name()) {
                kinds.push(kind);
            }
        }
        for kind in kinds {
            if let Err(e) = stores.open_extension(&kind) {
                error!(
                    company = %stores.company.company_id,
                    kind = kind.element_name(),
                    error = %e,
                    "cannot open extension collection"
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Companies
    // ------------------------------------------------------------------

    /// All companies below the root with a readable descriptor, by id.
    pub fn list_companies(&self) -> CoreResult<Vec<CompanyInfo>> {
        self.tenants.list_companies()
    }

    /// Creates a company directory with its initial settings.
    ///
    /// Does not make the company current.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCompanyId`] for an unusable id and
    /// [`CoreError::CompanyExists`] if the company already has settings.
    pub fn add_company(&self, info: &CompanyInfo) -> CoreResult<()> {
        validate_company_id(&info.company_id)?;
        let mut shared = self.shared.write();
        self.acquire_lock(&mut shared)?;
        self.tenants.add_company(info)
    }

    /// Makes a company current and reconnects.
    ///
    /// If the root settings file cannot be rewritten the switch is aborted
    /// and the previous company stays active.
    pub fn switch_company(&self, info: &CompanyInfo) -> CoreResult<bool> {
        validate_company_id(&info.company_id)?;
        let mut shared = self.shared.write();
        let previous = shared.tenant.as_ref().map(|t| t.company.company_id.clone());

        if let Err(e) = self
            .acquire_lock(&mut shared)
            .and_then(|()| self.tenants.write_current(info))
        {
            error!(
                company = %info.company_id,
                previous = ?previous,
                error = %e,
                "switch aborted"
            );
            return Err(e);
        }

        info!(company = %info.company_id, previous = ?previous, "switching company");
        self.connect_locked(&mut shared)
    }

    fn with_tenant<R>(&self, f: impl FnOnce(&TenantStores) -> CoreResult<R>) -> CoreResult<R> {
        let shared = self.shared.read();
        match (&shared.tenant, shared.state) {
            (Some(stores), StoreState::Ready) => f(stores),
            (_, state) => Err(CoreError::NotReady { state }),
        }
    }

    /// Runs `f` with a read-only view of the active company.
    pub fn view<R>(&self, f: impl FnOnce(&StoreView<'_>) -> CoreResult<R>) -> CoreResult<R> {
        self.with_tenant(|t| f(&StoreView::new(t)))
    }

    /// Summaries of every open collection of the active company.
    pub fn collections(&self) -> CoreResult<Vec<CollectionInfo>> {
        self.with_tenant(|t| {
            let extensions: Vec<_> = t
                .extension_names()
                .iter()
                .filter_map(|name| t.extension_by_name(name))
                .collect();
            let built_in = [&t.articles, &t.customers, &t.documents, &t.others];
            Ok(built_in
                .into_iter()
                .chain(extensions.iter().map(|s| &**s))
                .map(|store| CollectionInfo {
                    name: store.name().to_string(),
                    location: store.location(),
                    entries: store.snapshot().children().len(),
                })
                .collect())
        })
    }

    fn next_id_in(&self, scope: &IdScope, ids: Vec<String>, claim: bool) -> CoreResult<u64> {
        if claim {
            self.allocator.claim_next(scope, ids)
        } else {
            self.allocator.next_id(scope, ids)
        }
    }

    // ------------------------------------------------------------------
    // Articles
    // ------------------------------------------------------------------

    /// An article with its unit and tax class resolved.
    pub fn article(&self, id: &str) -> CoreResult<Option<Article>> {
        self.with_tenant(|t| StoreView::new(t).article(id))
    }

    /// Previews of all articles in file order.
    pub fn articles(&self) -> CoreResult<Vec<ArticlePreview>> {
        self.with_tenant(|t| {
            Ok(StoreView::new(t)
                .articles()
                .map(|a| ArticlePreview::from(&a))
                .collect())
        })
    }

    /// Lazy iterator over a snapshot of all articles.
    pub fn iter_articles(&self) -> CoreResult<RecordIter<Article>> {
        self.with_tenant(|t| Ok(StoreView::new(t).articles()))
    }

    /// Inserts or replaces an article.
    pub fn save_article(&self, article: &Article) -> CoreResult<()> {
        self.with_tenant(|t| Collection::<Article>::new(&t.articles).upsert(article))
    }

    /// Inserts or replaces articles with a single file rewrite.
    pub fn save_articles(&self, articles: &[Article]) -> CoreResult<usize> {
        self.with_tenant(|t| Collection::<Article>::new(&t.articles).upsert_many(articles))
    }

    /// True if the id is persisted or reserved.
    pub fn article_exists(&self, id: &str) -> CoreResult<bool> {
        self.with_tenant(|t| {
            Ok(Collection::<Article>::new(&t.articles).exists(id)
                || self.allocator.is_reserved(&IdScope::Articles, id))
        })
    }

    /// Next free article id.
    pub fn next_article_id(&self) -> CoreResult<u64> {
        self.with_tenant(|t| {
            self.next_id_in(&IdScope::Articles, t.articles.ids(&Article::spec()), false)
        })
    }

    /// Next free article id, reserved for the caller.
    pub fn claim_next_article_id(&self) -> CoreResult<u64> {
        self.with_tenant(|t| {
            self.next_id_in(&IdScope::Articles, t.articles.ids(&Article::spec()), true)
        })
    }

    /// Replaces a tentative article id; an empty `new` releases `old`.
    pub fn update_reserved_article_id(&self, old: &str, new: &str) {
        self.allocator.update_reservation(&IdScope::Articles, old, new);
    }

    // ------------------------------------------------------------------
    // Customers
    // ------------------------------------------------------------------

    /// A customer with the default payment method resolved.
    pub fn customer(&self, id: &str) -> CoreResult<Option<Customer>> {
        self.with_tenant(|t| StoreView::new(t).customer(id))
    }

    /// Previews of all customers in file order.
    pub fn customers(&self) -> CoreResult<Vec<CustomerPreview>> {
        self.with_tenant(|t| {
            Ok(StoreView::new(t)
                .customers()
                .map(|c| CustomerPreview::from(&c))
                .collect())
        })
    }

    /// Lazy iterator over a snapshot of all customers.
    pub fn iter_customers(&self) -> CoreResult<RecordIter<Customer>> {
        self.with_tenant(|t| Ok(StoreView::new(t).customers()))
    }

    /// Inserts or replaces a customer.
    pub fn save_customer(&self, customer: &Customer) -> CoreResult<()> {
        self.with_tenant(|t| Collection::<Customer>::new(&t.customers).upsert(customer))
    }

    /// Inserts or replaces customers with a single file rewrite.
    pub fn save_customers(&self, customers: &[Customer]) -> CoreResult<usize> {
        self.with_tenant(|t| Collection::<Customer>::new(&t.customers).upsert_many(customers))
    }

    /// True if the id is persisted or reserved.
    pub fn customer_exists(&self, id: &str) -> CoreResult<bool> {
        self.with_tenant(|t| {
            Ok(Collection::<Customer>::new(&t.customers).exists(id)
                || self.allocator.is_reserved(&IdScope::Customers, id))
        })
    }

    /// Next free customer id.
    pub fn next_customer_id(&self) -> CoreResult<u64> {
        self.with_tenant(|t| {
            self.next_id_in(&IdScope::Customers, t.customers.ids(&Customer::spec()), false)
        })
    }

    /// Next free customer id, reserved for the caller.
    pub fn claim_next_customer_id(&self) -> CoreResult<u64> {
        self.with_tenant(|t| {
            self.next_id_in(&IdScope::Customers, t.customers.ids(&Customer::spec()), true)
        })
    }

    /// Replaces a tentative customer id; an empty `new` releases `old`.
    pub fn update_reserved_customer_id(&self, old: &str, new: &str) {
        self.allocator
            .update_reservation(&IdScope::Customers, old, new);
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// A document, enriched by the parsers registered for its type.
    pub fn document(&self, document_type: &str, id: &str) -> CoreResult<Option<Document>> {
        self.with_tenant(|t| {
            let view = StoreView::new(t);
            let Some(raw) = view.raw_document(document_type, id) else {
                return Ok(None);
            };
            let mut document = Document::from_element(&raw)?;
            self.pipeline.enrich_document(&mut document, &raw, &view);
            Ok(Some(document))
        })
    }

    /// The enriched preview of one document.
    pub fn document_preview(
        &self,
        document_type: &str,
        id: &str,
    ) -> CoreResult<Option<DocumentPreview>> {
        self.with_tenant(|t| {
            let Some(raw) = t.documents.get(&document_spec(document_type), id) else {
                return Ok(None);
            };
            let mut preview = DocumentPreview::from_element(&raw)?;
            self.pipeline.enrich_preview(&mut preview, &raw);
            Ok(Some(preview))
        })
    }

    /// Enriched previews of all documents of one type, in file order.
    pub fn documents(&self, document_type: &str) -> CoreResult<Vec<DocumentPreview>> {
        self.with_tenant(|t| {
            Ok(self.previews(t.documents.scan(&document_spec(document_type)), |_| true))
        })
    }

    /// Enriched previews of documents dated within `start..=end`.
    ///
    /// `document_type` restricts the result to one type. Documents whose
    /// id or date cannot be read are logged and skipped.
    pub fn documents_in_interval(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        document_type: Option<&str>,
    ) -> CoreResult<Vec<DocumentPreview>> {
        self.with_tenant(|t| {
            let candidates = t
                .documents
                .scan_all_children()
                .into_iter()
                .filter(|raw| document_type.map_or(true, |ty| raw.name() == ty))
                .collect();
            Ok(self.previews(candidates, |p| p.date >= start && p.date <= end))
        })
    }

    fn previews(
        &self,
        elements: Vec<Element>,
        keep: impl Fn(&DocumentPreview) -> bool,
    ) -> Vec<DocumentPreview> {
        let mut previews = Vec::new();
        for raw in elements {
            let mut preview = match DocumentPreview::from_element(&raw) {
                Ok(preview) => preview,
                Err(e) => {
                    warn!(document_type = raw.name(), error = %e, "skipping undecodable document");
                    continue;
                }
            };
            if !keep(&preview) {
                continue;
            }
            self.pipeline.enrich_preview(&mut preview, &raw);
            previews.push(preview);
        }
        previews
    }

    /// Every document of one type, not enriched.
    pub fn all_documents(&self, document_type: &str) -> CoreResult<Vec<Document>> {
        self.with_tenant(|t| {
            let mut documents = Vec::new();
            for raw in t.documents.scan(&document_spec(document_type)) {
                match Document::from_element(&raw) {
                    Ok(document) => documents.push(document),
                    Err(e) => {
                        warn!(document_type, error = %e, "skipping undecodable document");
                    }
                }
            }
            Ok(documents)
        })
    }

    /// Inserts or replaces a document.
    ///
    /// `extra` is not persisted.
    pub fn save_document(&self, document: &Document) -> CoreResult<()> {
        check_document_type(&document.document_type)?;
        self.with_tenant(|t| {
            t.documents
                .upsert(&document_spec(&document.document_type), document.to_element())
        })
    }

    /// Inserts or replaces documents of any types with a single file rewrite.
    pub fn save_documents(&self, documents: &[Document]) -> CoreResult<usize> {
        for document in documents {
            check_document_type(&document.document_type)?;
        }
        self.with_tenant(|t| {
            t.documents.upsert_all(
                documents
                    .iter()
                    .map(|d| (document_spec(&d.document_type), d.to_element()))
                    .collect(),
            )
        })
    }

    /// True if the id is persisted or reserved for the type.
    pub fn document_exists(&self, document_type: &str, id: &str) -> CoreResult<bool> {
        self.with_tenant(|t| {
            Ok(t.documents.exists(&document_spec(document_type), id)
                || self
                    .allocator
                    .is_reserved(&IdScope::Documents(document_type.to_string()), id))
        })
    }

    /// Next free id of a document type.
    pub fn next_document_id(&self, document_type: &str) -> CoreResult<u64> {
        self.with_tenant(|t| {
            let scope = IdScope::Documents(document_type.to_string());
            self.next_id_in(&scope, t.documents.ids(&document_spec(document_type)), false)
        })
    }

    /// Next free id of a document type, reserved for the caller.
    pub fn claim_next_document_id(&self, document_type: &str) -> CoreResult<u64> {
        self.with_tenant(|t| {
            let scope = IdScope::Documents(document_type.to_string());
            self.next_id_in(&scope, t.documents.ids(&document_spec(document_type)), true)
        })
    }

    /// Replaces a tentative document id; an empty `new` releases `old`.
    pub fn update_reserved_document_id(&self, document_type: &str, old: &str, new: &str) {
        self.allocator
            .update_reservation(&IdScope::Documents(document_type.to_string()), old, new);
    }

    /// Adds a parser to the enrichment pipeline.
    ///
    /// Parsers stay registered for the lifetime of the handle, across
    /// company switches.
    pub fn register_document_parser(&self, parser: Arc<dyn DocumentParser>) {
        debug!(document_type = parser.document_type(), "registered document parser");
        self.pipeline.register(parser);
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// All payment methods.
    pub fn payment_methods(&self) -> CoreResult<Vec<PaymentMethod>> {
        self.with_tenant(|t| Ok(StoreView::new(t).payment_methods()))
    }

    /// Inserts or replaces a payment method by name.
    pub fn save_payment_method(&self, method: &PaymentMethod) -> CoreResult<()> {
        self.with_tenant(|t| Collection::<PaymentMethod>::new(&t.others).upsert(method))
    }

    /// All tax classes.
    pub fn tax_classes(&self) -> CoreResult<Vec<TaxClass>> {
        self.with_tenant(|t| Ok(StoreView::new(t).tax_classes()))
    }

    /// Inserts or replaces a tax class by name.
    pub fn save_tax_class(&self, tax_class: &TaxClass) -> CoreResult<()> {
        self.with_tenant(|t| Collection::<TaxClass>::new(&t.others).upsert(tax_class))
    }

    /// All units.
    pub fn units(&self) -> CoreResult<Vec<Unit>> {
        self.with_tenant(|t| Ok(StoreView::new(t).units()))
    }

    /// Inserts or replaces a unit by name.
    pub fn save_unit(&self, unit: &Unit) -> CoreResult<()> {
        self.with_tenant(|t| Collection::<Unit>::new(&t.others).upsert(unit))
    }

    /// The settings blob of the active company; empty if never saved.
    pub fn settings(&self) -> CoreResult<SettingsBlob> {
        self.with_tenant(|t| StoreView::new(t).settings())
    }

    /// Replaces the settings blob.
    pub fn save_settings(&self, settings: &SettingsBlob) -> CoreResult<()> {
        let element = settings.to_element()?;
        self.with_tenant(|t| t.others.set_child(element))
    }

    // ------------------------------------------------------------------
    // Extensions
    // ------------------------------------------------------------------

    /// Registers an extension kind.
    ///
    /// When a company is active the kind's collection is opened (and its
    /// file created) right away; with `persist` the kind is also remembered
    /// for this handle and in the company's durable list, so every later
    /// `connect` reopens it. Without an active company a persisted kind is
    /// only queued for the next `connect`.
    ///
    /// Returns `true` if the collection is open for the active company.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidKind`] for a malformed kind and
    /// [`CoreError::NotReady`] for a non-persisted kind without an active
    /// company.
    pub fn register_extension_kind(&self, kind: &ExtensionKind, persist: bool) -> CoreResult<bool> {
        kind.validate()?;
        let shared = self.shared.read();
        match (&shared.tenant, shared.state) {
            (Some(stores), StoreState::Ready) => {
                stores.open_extension(kind)?;
                if persist {
                    self.kinds.register(kind);
                    persist_kind(&stores.others, kind)?;
                }
                info!(
                    company = %stores.company.company_id,
                    kind = kind.element_name(),
                    persist,
                    "registered extension kind"
                );
                Ok(true)
            }
            (_, state) if persist => {
                self.kinds.register(kind);
                debug!(kind = kind.element_name(), %state, "queued extension kind");
                Ok(false)
            }
            (_, state) => Err(CoreError::NotReady { state }),
        }
    }

    /// Kinds remembered for replay on `connect`.
    pub fn extension_kinds(&self) -> Vec<ExtensionKind> {
        self.kinds.all()
    }

    fn extension_store(
        &self,
        stores: &TenantStores,
        kind: &ExtensionKind,
    ) -> CoreResult<Option<Arc<CollectionStore>>> {
        match stores.extension(kind) {
            Some(store) => Ok(Some(store)),
            None if self.config.strict_extensions => Err(CoreError::UnregisteredKind {
                name: kind.element_name().to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Inserts or replaces an extension record.
    ///
    /// Returns `false` without writing if the kind is not registered.
    pub fn save_extension<T: NamedRecord>(&self, record: &T) -> CoreResult<bool> {
        let kind = ExtensionKind::of::<T>();
        self.with_tenant(|t| match self.extension_store(t, &kind)? {
            Some(store) => {
                Collection::<T>::with_spec(&store, kind.spec()).upsert(record)?;
                Ok(true)
            }
            None => Ok(false),
        })
    }

    /// An extension record; `None` also for an unregistered kind.
    pub fn get_extension<T: NamedRecord>(&self, id: &str) -> CoreResult<Option<T>> {
        let kind = ExtensionKind::of::<T>();
        self.with_tenant(|t| match self.extension_store(t, &kind)? {
            Some(store) => Collection::<T>::with_spec(&store, kind.spec()).get(id),
            None => Ok(None),
        })
    }

    /// True if the id is persisted or reserved; `false` for an
    /// unregistered kind.
    pub fn extension_exists<T: NamedRecord>(&self, id: &str) -> CoreResult<bool> {
        let kind = ExtensionKind::of::<T>();
        self.with_tenant(|t| match self.extension_store(t, &kind)? {
            Some(store) => Ok(Collection::<T>::with_spec(&store, kind.spec()).exists(id)
                || self.allocator.is_reserved(&extension_scope(&kind), id)),
            None => Ok(false),
        })
    }

    /// All decodable records of an extension kind.
    pub fn all_extensions<T: NamedRecord>(&self) -> CoreResult<Vec<T>> {
        let kind = ExtensionKind::of::<T>();
        self.with_tenant(|t| match self.extension_store(t, &kind)? {
            Some(store) => Ok(Collection::<T>::with_spec(&store, kind.spec()).scan_all()),
            None => Ok(Vec::new()),
        })
    }

    /// Raw elements of an open extension collection, by collection name.
    pub fn extension_elements(&self, collection: &str) -> CoreResult<Vec<Element>> {
        self.with_tenant(|t| match t.extension_by_name(collection) {
            Some(store) => Ok(store.scan_all_children()),
            None if self.config.strict_extensions => Err(CoreError::UnregisteredKind {
                name: collection.to_string(),
            }),
            None => Ok(Vec::new()),
        })
    }

    /// Next free id of an extension kind.
    ///
    /// An unregistered kind has no persisted ids, so only reservations count.
    pub fn next_extension_id<T: NamedRecord>(&self) -> CoreResult<u64> {
        let kind = ExtensionKind::of::<T>();
        self.with_tenant(|t| {
            let ids = self
                .extension_store(t, &kind)?
                .map(|store| store.ids(&kind.spec()))
                .unwrap_or_default();
            self.next_id_in(&extension_scope(&kind), ids, false)
        })
    }

    /// Replaces a tentative extension record id; an empty `new` releases `old`.
    pub fn update_reserved_extension_id<T: NamedRecord>(&self, old: &str, new: &str) {
        self.allocator
            .update_reservation(&extension_scope(&ExtensionKind::of::<T>()), old, new);
    }
}

fn extension_scope(kind: &ExtensionKind) -> IdScope {
    IdScope::Extension(kind.element_name().to_string())
}

fn check_document_type(document_type: &str) -> CoreResult<()> {
    if is_xml_name(document_type) {
        Ok(())
    } else {
        Err(CoreError::invalid_operation(format!(
            "invalid document type {document_type:?}"
        )))
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.read();
        f.debug_struct("Database")
            .field("root", &self.root())
            .field("state", &shared.state)
            .field("tenant", &shared.tenant)
            .field("parsers", &self.pipeline.len())
            .finish_non_exhaustive()
    }
}
