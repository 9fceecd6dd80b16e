//! Read-only access to the active company.

use crate::collection::{Collection, NamedRecord, RecordIter};
use crate::error::CoreResult;
use crate::extension::ExtensionKind;
use crate::models::{
    document_spec, Article, Customer, Document, PaymentMethod, SettingsBlob, TaxClass, Unit,
};
use crate::tenant::{CompanyInfo, TenantStores};
use officedb_codec::Element;
use tracing::warn;

/// Read-only handle over the collections of the active company.
///
/// Handed to enrichment parsers for follow-up lookups. Documents read
/// through a view are never enriched, so parsers cannot recurse into the
/// pipeline.
pub struct StoreView<'a> {
    stores: &'a TenantStores,
}

impl<'a> StoreView<'a> {
    pub(crate) fn new(stores: &'a TenantStores) -> Self {
        Self { stores }
    }

    /// Descriptor of the active company.
    #[must_use]
    pub fn company(&self) -> &CompanyInfo {
        &self.stores.company
    }

    /// An article with its unit and tax class resolved by name.
    ///
    /// A reference that matches no stored entry keeps its name-only value.
    pub fn article(&self, id: &str) -> CoreResult<Option<Article>> {
        let Some(mut article) = Collection::<Article>::new(&self.stores.articles).get(id)? else {
            return Ok(None);
        };
        if let Some(unit) = self.resolve::<Unit>(&article.unit.name) {
            article.unit = unit;
        }
        if let Some(tax_class) = self.resolve::<TaxClass>(&article.tax_class.name) {
            article.tax_class = tax_class;
        }
        Ok(Some(article))
    }

    /// Articles as stored, with name-only references.
    #[must_use]
    pub fn articles(&self) -> RecordIter<Article> {
        Collection::<Article>::new(&self.stores.articles).iter()
    }

    /// A customer with the default payment method resolved by name.
    pub fn customer(&self, id: &str) -> CoreResult<Option<Customer>> {
        let Some(mut customer) = Collection::<Customer>::new(&self.stores.customers).get(id)?
        else {
            return Ok(None);
        };
        if let Some(method) = self.resolve::<PaymentMethod>(&customer.default_payment_method.name) {
            customer.default_payment_method = method;
        }
        Ok(Some(customer))
    }

    /// Customers as stored, with name-only references.
    #[must_use]
    pub fn customers(&self) -> RecordIter<Customer> {
        Collection::<Customer>::new(&self.stores.customers).iter()
    }

    /// A tax class by name.
    pub fn tax_class(&self, name: &str) -> CoreResult<Option<TaxClass>> {
        Collection::<TaxClass>::new(&self.stores.others).get(name)
    }

    /// All tax classes.
    #[must_use]
    pub fn tax_classes(&self) -> Vec<TaxClass> {
        Collection::<TaxClass>::new(&self.stores.others).scan_all()
    }

    /// A unit by name.
    pub fn unit(&self, name: &str) -> CoreResult<Option<Unit>> {
        Collection::<Unit>::new(&self.stores.others).get(name)
    }

    /// All units.
    #[must_use]
    pub fn units(&self) -> Vec<Unit> {
        Collection::<Unit>::new(&self.stores.others).scan_all()
    }

    /// A payment method by name.
    pub fn payment_method(&self, name: &str) -> CoreResult<Option<PaymentMethod>> {
        Collection::<PaymentMethod>::new(&self.stores.others).get(name)
    }

    /// All payment methods.
    #[must_use]
    pub fn payment_methods(&self) -> Vec<PaymentMethod> {
        Collection::<PaymentMethod>::new(&self.stores.others).scan_all()
    }

    /// The free-form settings blob, empty if never saved.
    pub fn settings(&self) -> CoreResult<SettingsBlob> {
        match self.stores.others.child(SettingsBlob::ELEMENT_NAME) {
            Some(element) => SettingsBlob::from_element(&element),
            None => Ok(SettingsBlob::new()),
        }
    }

    /// A document without enrichment.
    pub fn document(&self, document_type: &str, id: &str) -> CoreResult<Option<Document>> {
        use crate::collection::RecordCodec;
        match self.raw_document(document_type, id) {
            Some(raw) => Ok(Some(Document::from_element(&raw)?)),
            None => Ok(None),
        }
    }

    /// The stored element of a document.
    #[must_use]
    pub fn raw_document(&self, document_type: &str, id: &str) -> Option<Element> {
        self.stores.documents.get(&document_spec(document_type), id)
    }

    /// A record of a registered extension kind.
    ///
    /// `Ok(None)` if the kind is not registered for this company.
    pub fn extension<T: NamedRecord>(&self, id: &str) -> CoreResult<Option<T>> {
        let kind = ExtensionKind::of::<T>();
        match self.stores.extension(&kind) {
            Some(store) => Collection::<T>::with_spec(&store, kind.spec()).get(id),
            None => Ok(None),
        }
    }

    fn resolve<T: NamedRecord>(&self, name: &str) -> Option<T> {
        if name.is_empty() {
            return None;
        }
        match Collection::<T>::new(&self.stores.others).get(name) {
            Ok(found) => found,
            Err(e) => {
                warn!(element = T::ELEMENT_NAME, name, error = %e, "cannot resolve reference");
                None
            }
        }
    }
}
