//! The open collections of the active company.

use super::CompanyInfo;
use crate::collection::CollectionStore;
use crate::dir::DataDir;
use crate::error::CoreResult;
use crate::extension::ExtensionKind;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub(crate) const ARTICLES: &str = "Articles";
pub(crate) const CUSTOMERS: &str = "Customers";
pub(crate) const DOCUMENTS: &str = "Documents";
pub(crate) const OTHERS: &str = "Others";
/// Root element of the Others collection.
pub(crate) const OTHERS_ROOT: &str = "Settings";

/// Collection stores of one company.
///
/// Built-in collections are opened together; any failure makes the whole
/// company unusable. Extension collections are added as kinds register.
pub(crate) struct TenantStores {
    pub(crate) company: CompanyInfo,
    pub(crate) articles: CollectionStore,
    pub(crate) customers: CollectionStore,
    pub(crate) documents: CollectionStore,
    pub(crate) others: CollectionStore,
    extensions: RwLock<BTreeMap<String, Arc<CollectionStore>>>,
    dir: DataDir,
}

impl TenantStores {
    /// Opens (creating if needed) the built-in collections of a company.
    pub(crate) fn open(dir: &DataDir, company: CompanyInfo) -> CoreResult<Self> {
        let start = Instant::now();
        let id = company.company_id.as_str();
        std::fs::create_dir_all(dir.company_dir(id))?;

        let open = |name: &str, root: &str| -> CoreResult<CollectionStore> {
            CollectionStore::open(name, root, Box::new(dir.collection_backend(id, name)?))
        };

        let articles = open(ARTICLES, ARTICLES)?;
        let customers = open(CUSTOMERS, CUSTOMERS)?;
        let documents = open(DOCUMENTS, DOCUMENTS)?;
        let others = open(OTHERS, OTHERS_ROOT)?;

        let stores = Self {
            company,
            articles,
            customers,
            documents,
            others,
            extensions: RwLock::new(BTreeMap::new()),
            dir: dir.clone(),
        };

        info!(
            company = %stores.company.company_id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "opened company collections"
        );
        Ok(stores)
    }

    /// Opens the backing collection of an extension kind if not open yet.
    pub(crate) fn open_extension(&self, kind: &ExtensionKind) -> CoreResult<Arc<CollectionStore>> {
        let name = kind.collection_name();
        if let Some(store) = self.extensions.read().get(&name) {
            return Ok(Arc::clone(store));
        }

        let mut extensions = self.extensions.write();
        if let Some(store) = extensions.get(&name) {
            return Ok(Arc::clone(store));
        }
        let backend = self
            .dir
            .collection_backend(&self.company.company_id, &name)?;
        let store = Arc::new(CollectionStore::open(&name, &name, Box::new(backend))?);
        extensions.insert(name.clone(), Arc::clone(&store));
        debug!(company = %self.company.company_id, collection = %name, "opened extension collection");
        Ok(store)
    }

    /// The open collection of an extension kind, if registered.
    pub(crate) fn extension(&self, kind: &ExtensionKind) -> Option<Arc<CollectionStore>> {
        self.extensions.read().get(&kind.collection_name()).cloned()
    }

    /// Names of all open extension collections.
    pub(crate) fn extension_names(&self) -> Vec<String> {
        self.extensions.read().keys().cloned().collect()
    }

    /// Open extension collection by collection name.
    pub(crate) fn extension_by_name(&self, name: &str) -> Option<Arc<CollectionStore>> {
        self.extensions.read().get(name).cloned()
    }
}

impl std::fmt::Debug for TenantStores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantStores")
            .field("company", &self.company.company_id)
            .field("extensions", &self.extension_names())
            .finish_non_exhaustive()
    }
}
