//! Typed collection implementation.

use crate::collection::codec::NamedRecord;
use crate::collection::store::{CollectionStore, RecordSpec};
use crate::error::CoreResult;
use officedb_codec::Element;
use std::marker::PhantomData;
use tracing::warn;

/// A typed view of records of type `T` inside a [`CollectionStore`].
///
/// # Language-Native Querying
///
/// There is no query language. Filtering is done with iterator adapters:
///
/// ```rust,ignore
/// let cheap: Vec<Article> = articles
///     .iter()
///     .filter(|a| a.price.amount < 1000)
///     .collect();
/// ```
pub struct Collection<'a, T: NamedRecord> {
    store: &'a CollectionStore,
    spec: RecordSpec,
    _marker: PhantomData<T>,
}

impl<'a, T: NamedRecord> Collection<'a, T> {
    /// Creates a typed view addressing `T::spec()`.
    pub fn new(store: &'a CollectionStore) -> Self {
        Self::with_spec(store, T::spec())
    }

    /// Creates a typed view with an explicit record address.
    pub fn with_spec(store: &'a CollectionStore, spec: RecordSpec) -> Self {
        Self {
            store,
            spec,
            _marker: PhantomData,
        }
    }

    /// Returns the collection name.
    pub fn name(&self) -> &str {
        self.store.name()
    }

    /// Gets a record by id.
    ///
    /// Returns `None` if no record has the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be decoded.
    pub fn get(&self, id: &str) -> CoreResult<Option<T>> {
        match self.store.get(&self.spec, id) {
            Some(element) => Ok(Some(T::from_element(&element)?)),
            None => Ok(None),
        }
    }

    /// Checks if a record exists.
    pub fn exists(&self, id: &str) -> bool {
        self.store.exists(&self.spec, id)
    }

    /// Inserts or replaces a record.
    pub fn upsert(&self, record: &T) -> CoreResult<()> {
        self.store.upsert(&self.spec, record.to_element())
    }

    /// Inserts or replaces records with a single file rewrite.
    pub fn upsert_many(&self, records: &[T]) -> CoreResult<usize> {
        self.store
            .upsert_many(&self.spec, records.iter().map(T::to_element).collect())
    }

    /// Ids of all records in file order.
    pub fn ids(&self) -> Vec<String> {
        self.store.ids(&self.spec)
    }

    /// Returns a lazy iterator over a snapshot of the records.
    ///
    /// Records that fail to decode are logged and skipped. Calling `iter`
    /// again starts over from a fresh snapshot.
    pub fn iter(&self) -> RecordIter<T> {
        RecordIter::new(self.store.name(), self.store.scan(&self.spec))
    }

    /// Decodes every record, skipping undecodable ones.
    ///
    /// **Warning**: This is a full scan.
    pub fn scan_all(&self) -> Vec<T> {
        self.iter().collect()
    }
}

/// Lazy decoding iterator over a snapshot of records.
pub struct RecordIter<T> {
    collection: String,
    items: std::vec::IntoIter<Element>,
    skipped: usize,
    _marker: PhantomData<T>,
}

impl<T> RecordIter<T> {
    pub(crate) fn new(collection: impl Into<String>, items: Vec<Element>) -> Self {
        Self {
            collection: collection.into(),
            items: items.into_iter(),
            skipped: 0,
            _marker: PhantomData,
        }
    }

    /// Number of records skipped so far because they failed to decode.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<T: NamedRecord> Iterator for RecordIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        for element in self.items.by_ref() {
            match T::from_element(&element) {
                Ok(record) => return Some(record),
                Err(e) => {
                    self.skipped += 1;
                    warn!(
                        collection = %self.collection,
                        element = element.name(),
                        error = %e,
                        "skipping undecodable record"
                    );
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::RecordCodec;
    use officedb_codec::CodecResult;
    use officedb_storage::InMemoryBackend;

    #[derive(Debug, Clone, PartialEq)]
    struct Project {
        id: String,
        budget: u32,
    }

    impl RecordCodec for Project {
        fn to_element(&self) -> Element {
            Element::new("Project")
                .with_text_child("ProjectID", &self.id)
                .with_text_child("Budget", self.budget.to_string())
        }

        fn from_element(element: &Element) -> CodecResult<Self> {
            element.expect_name("Project")?;
            Ok(Self {
                id: element.required_text("ProjectID")?.to_string(),
                budget: element.parse_child("Budget")?,
            })
        }
    }

    impl NamedRecord for Project {
        const ELEMENT_NAME: &'static str = "Project";
        const ID_FIELD: &'static str = "ProjectID";

        fn record_id(&self) -> String {
            self.id.clone()
        }
    }

    fn project(id: &str, budget: u32) -> Project {
        Project {
            id: id.to_string(),
            budget,
        }
    }

    fn store_with(xml: &str) -> CollectionStore {
        let backend = InMemoryBackend::with_data(xml.as_bytes().to_vec());
        CollectionStore::open("Projects", "Projects", Box::new(backend)).unwrap()
    }

    #[test]
    fn get_round_trips() {
        let store = store_with("<Projects/>");
        let projects = Collection::<Project>::new(&store);

        let p = project("1000", 50);
        projects.upsert(&p).unwrap();

        assert_eq!(projects.get("1000").unwrap(), Some(p));
        assert_eq!(projects.get("9999").unwrap(), None);
        assert!(projects.exists("1000"));
    }

    #[test]
    fn upsert_is_idempotent_on_id() {
        let store = store_with("<Projects/>");
        let projects = Collection::<Project>::new(&store);

        projects.upsert(&project("1", 10)).unwrap();
        projects.upsert(&project("1", 20)).unwrap();

        assert_eq!(projects.ids(), ["1"]);
        assert_eq!(projects.get("1").unwrap().unwrap().budget, 20);
    }

    #[test]
    fn iter_skips_broken_records() {
        let store = store_with(
            "<Projects>\
               <Project><ProjectID>1</ProjectID><Budget>10</Budget></Project>\
               <Project><ProjectID>2</ProjectID><Budget>lots</Budget></Project>\
               <Project><ProjectID>3</ProjectID><Budget>30</Budget></Project>\
             </Projects>",
        );
        let projects = Collection::<Project>::new(&store);

        let mut iter = projects.iter();
        let ids: Vec<_> = iter.by_ref().map(|p| p.id).collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(iter.skipped(), 1);
    }

    #[test]
    fn iter_is_restartable_and_snapshotted() {
        let store = store_with("<Projects/>");
        let projects = Collection::<Project>::new(&store);
        projects.upsert(&project("1", 10)).unwrap();

        let first = projects.iter();
        projects.upsert(&project("2", 20)).unwrap();

        assert_eq!(first.count(), 1);
        assert_eq!(projects.iter().count(), 2);
    }

    #[test]
    fn get_surfaces_decode_errors() {
        let store = store_with(
            "<Projects><Project><ProjectID>1</ProjectID><Budget>x</Budget></Project></Projects>",
        );
        let projects = Collection::<Project>::new(&store);
        assert!(projects.get("1").is_err());
    }
}
