//! File-backed element tree of one collection.

use crate::error::{CoreError, CoreResult};
use officedb_codec::{from_xml, to_xml, Element};
use officedb_storage::StorageBackend;
use parking_lot::Mutex;
use std::time::Instant;
use tracing::{debug, error};

/// Where records of one shape live inside a collection tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpec {
    /// Wrapping list element below the root, or `None` for direct children.
    pub container: Option<String>,
    /// Element name of one record.
    pub element: String,
    /// Child element holding the record id.
    pub id_field: String,
}

impl RecordSpec {
    /// Records stored directly below the collection root.
    pub fn new(element: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self {
            container: None,
            element: element.into(),
            id_field: id_field.into(),
        }
    }

    /// Records stored inside a list element below the root.
    pub fn nested(
        container: impl Into<String>,
        element: impl Into<String>,
        id_field: impl Into<String>,
    ) -> Self {
        Self {
            container: Some(container.into()),
            element: element.into(),
            id_field: id_field.into(),
        }
    }

    fn matches(&self, candidate: &Element, id: &str) -> bool {
        candidate.name() == self.element && candidate.child_text(&self.id_field) == Some(id)
    }

    fn list<'a>(&self, root: &'a Element) -> Option<&'a Element> {
        match &self.container {
            Some(container) => root.child(container),
            None => Some(root),
        }
    }

    fn list_mut<'a>(&self, root: &'a mut Element) -> &'a mut Element {
        match &self.container {
            Some(container) => root.child_or_insert(container),
            None => root,
        }
    }
}

struct Inner {
    root: Element,
    backend: Box<dyn StorageBackend>,
}

/// One named collection: an in-memory element tree and its backing file.
///
/// The store is the only writer of its file. Every mutation rewrites the
/// whole file before returning. If that write fails the in-memory tree is
/// restored to its state before the call, so memory and disk never
/// diverge.
///
/// All reads and writes take the same per-collection mutex.
pub struct CollectionStore {
    name: String,
    root_name: String,
    inner: Mutex<Inner>,
}

impl CollectionStore {
    /// Loads a collection, creating an empty correctly-rooted file if absent.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StorageUnavailable`] if the file cannot be
    /// created, read, or parsed, or if its root element is not `root_name`.
    pub fn open(
        name: impl Into<String>,
        root_name: impl Into<String>,
        mut backend: Box<dyn StorageBackend>,
    ) -> CoreResult<Self> {
        let start = Instant::now();
        let name = name.into();
        let root_name = root_name.into();
        let unavailable = |reason: String| CoreError::storage_unavailable(&name, reason);

        let existing = backend
            .read()
            .map_err(|e| unavailable(format!("{}: {e}", backend.location())))?;

        let root = match existing {
            Some(bytes) => {
                let root = from_xml(&bytes)
                    .map_err(|e| unavailable(format!("{}: {e}", backend.location())))?;
                if root.name() != root_name {
                    return Err(unavailable(format!(
                        "expected root <{root_name}>, found <{}>",
                        root.name()
                    )));
                }
                root
            }
            None => {
                let root = Element::new(&root_name);
                let bytes = to_xml(&root).map_err(|e| unavailable(e.to_string()))?;
                backend
                    .write(&bytes)
                    .map_err(|e| unavailable(format!("{}: {e}", backend.location())))?;
                debug!(collection = %name, location = %backend.location(), "created collection file");
                root
            }
        };

        debug!(
            collection = %name,
            records = root.children().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded collection"
        );

        Ok(Self {
            name,
            root_name,
            inner: Mutex::new(Inner { root, backend }),
        })
    }

    /// Collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expected root element name.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Where the collection is persisted.
    #[must_use]
    pub fn location(&self) -> String {
        self.inner.lock().backend.location()
    }

    fn read<R>(&self, f: impl FnOnce(&Element) -> R) -> R {
        let inner = self.inner.lock();
        f(&inner.root)
    }

    fn modify<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Element) -> CoreResult<R>,
    ) -> CoreResult<R> {
        let start = Instant::now();
        let mut inner = self.inner.lock();
        let before = inner.root.clone();

        let value = match f(&mut inner.root) {
            Ok(value) => value,
            Err(e) => {
                inner.root = before;
                return Err(e);
            }
        };

        if let Err(e) = Self::persist(&mut inner) {
            error!(
                collection = %self.name,
                op,
                error = %e,
                "write failed, in-memory state rolled back"
            );
            inner.root = before;
            return Err(e);
        }

        debug!(
            collection = %self.name,
            op,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "saved collection"
        );
        Ok(value)
    }

    fn persist(inner: &mut Inner) -> CoreResult<()> {
        let bytes = to_xml(&inner.root)?;
        inner.backend.write(&bytes)?;
        Ok(())
    }

    /// Returns true if a record with the id exists.
    #[must_use]
    pub fn exists(&self, spec: &RecordSpec, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.read(|root| {
            spec.list(root)
                .is_some_and(|list| list.children().iter().any(|c| spec.matches(c, id)))
        })
    }

    /// Returns a copy of the record with the id.
    #[must_use]
    pub fn get(&self, spec: &RecordSpec, id: &str) -> Option<Element> {
        if id.is_empty() {
            return None;
        }
        self.read(|root| {
            spec.list(root)
                .and_then(|list| list.children().iter().find(|c| spec.matches(c, id)))
                .cloned()
        })
    }

    /// Ids of all records of the shape, in file order.
    ///
    /// Records without the id field are left out.
    #[must_use]
    pub fn ids(&self, spec: &RecordSpec) -> Vec<String> {
        self.read(|root| {
            spec.list(root)
                .map(|list| {
                    list.children_named(&spec.element)
                        .filter_map(|c| c.child_text(&spec.id_field))
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    /// Copies of all records of the shape, in file order.
    #[must_use]
    pub fn scan(&self, spec: &RecordSpec) -> Vec<Element> {
        self.read(|root| {
            spec.list(root)
                .map(|list| list.children_named(&spec.element).cloned().collect())
                .unwrap_or_default()
        })
    }

    /// Copies of every element directly below the root.
    #[must_use]
    pub fn scan_all_children(&self) -> Vec<Element> {
        self.read(|root| root.children().to_vec())
    }

    /// Number of records of the shape.
    #[must_use]
    pub fn len(&self, spec: &RecordSpec) -> usize {
        self.read(|root| {
            spec.list(root)
                .map_or(0, |list| list.children_named(&spec.element).count())
        })
    }

    /// Inserts or replaces one record and rewrites the file.
    ///
    /// An existing record with the same id is replaced in place; otherwise
    /// the record is appended.
    ///
    /// # Errors
    ///
    /// Fails if the record has the wrong element name or no id, or if the
    /// file cannot be written. Nothing changes in either case.
    pub fn upsert(&self, spec: &RecordSpec, record: Element) -> CoreResult<()> {
        self.modify("upsert", |root| upsert_into(spec.list_mut(root), spec, record))
    }

    /// Inserts or replaces many records with a single file rewrite.
    ///
    /// Returns the number of records written. An empty batch does not
    /// touch the file.
    ///
    /// # Errors
    ///
    /// Same as [`upsert`](Self::upsert); a failure leaves the whole batch
    /// unapplied.
    pub fn upsert_many(&self, spec: &RecordSpec, records: Vec<Element>) -> CoreResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        self.modify("upsert_many", |root| {
            let list = spec.list_mut(root);
            let count = records.len();
            for record in records {
                upsert_into(list, spec, record)?;
            }
            Ok(count)
        })
    }

    /// Like [`upsert_many`](Self::upsert_many) for records of different shapes.
    pub fn upsert_all(&self, records: Vec<(RecordSpec, Element)>) -> CoreResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        self.modify("upsert_all", |root| {
            let count = records.len();
            for (spec, record) in records {
                upsert_into(spec.list_mut(root), &spec, record)?;
            }
            Ok(count)
        })
    }

    /// Copy of the first direct child of the root with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<Element> {
        self.read(|root| root.child(name).cloned())
    }

    /// Replaces (or appends) a singleton child of the root and rewrites the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn set_child(&self, element: Element) -> CoreResult<()> {
        self.modify("set_child", |root| {
            root.replace_child(element);
            Ok(())
        })
    }

    /// Copy of the whole tree.
    #[must_use]
    pub fn snapshot(&self) -> Element {
        self.read(Element::clone)
    }
}

impl std::fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore")
            .field("name", &self.name)
            .field("root_name", &self.root_name)
            .finish_non_exhaustive()
    }
}

fn upsert_into(list: &mut Element, spec: &RecordSpec, record: Element) -> CoreResult<()> {
    record.expect_name(&spec.element)?;
    let id = match record.child_text(&spec.id_field) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            return Err(CoreError::invalid_operation(format!(
                "<{}> record has no {}",
                spec.element, spec.id_field
            )))
        }
    };

    let children = list.children_mut();
    match children.iter().position(|c| spec.matches(c, &id)) {
        Some(index) => children[index] = record,
        None => children.push(record),
    }
    Ok(())
}
