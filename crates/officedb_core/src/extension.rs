//! Extension record kinds.
//!
//! An extension kind is a record type defined outside the core. It plugs into
//! the store through its element name and id field: records of kind
//! `Project` with id field `ProjectID` live in `Projects.xml` below a root
//! element `<Projects>`.
//!
//! Kinds registered with `persist` are remembered in the company's Others
//! file and reopened on every `connect`:
//!
//! ```text
//! <Settings>
//!   <ExtensionKinds>
//!     <ExtensionKind Name="Project" IdField="ProjectID"/>
//!   </ExtensionKinds>
//! </Settings>
//! ```

use crate::collection::{CollectionStore, NamedRecord, RecordSpec};
use crate::error::{CoreError, CoreResult};
use crate::tenant::{ARTICLES, CUSTOMERS, DOCUMENTS, OTHERS};
use officedb_codec::Element;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::warn;

const KINDS_CONTAINER: &str = "ExtensionKinds";
const KIND_ELEMENT: &str = "ExtensionKind";
const BUILT_IN_COLLECTIONS: [&str; 4] = [ARTICLES, CUSTOMERS, DOCUMENTS, OTHERS];

/// A dynamically registered record kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExtensionKind {
    element_name: String,
    id_field: String,
}

impl ExtensionKind {
    /// Creates a kind from its element name and id field.
    pub fn new(element_name: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self {
            element_name: element_name.into(),
            id_field: id_field.into(),
        }
    }

    /// The kind of a record type.
    #[must_use]
    pub fn of<T: NamedRecord>() -> Self {
        Self::new(T::ELEMENT_NAME, T::ID_FIELD)
    }

    /// Element name of one record.
    #[must_use]
    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// Child element holding the id.
    #[must_use]
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Collection (and root element) name: the element name plus `s`.
    #[must_use]
    pub fn collection_name(&self) -> String {
        format!("{}s", self.element_name)
    }

    /// Address of the kind's records inside its collection.
    #[must_use]
    pub fn spec(&self) -> RecordSpec {
        RecordSpec::new(&self.element_name, &self.id_field)
    }

    /// Checks that the kind can name a file and an element.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidKind`] if a name is empty or the element
    /// name contains characters not allowed in file or element names.
    pub fn validate(&self) -> CoreResult<()> {
        if self.element_name.trim().is_empty() {
            return Err(CoreError::invalid_kind("element name is empty"));
        }
        if self.id_field.trim().is_empty() {
            return Err(CoreError::invalid_kind(format!(
                "{} has an empty id field",
                self.element_name
            )));
        }
        for name in [&self.element_name, &self.id_field] {
            if !is_xml_name(name) {
                return Err(CoreError::invalid_kind(format!(
                    "{name:?} is not a valid element name"
                )));
            }
        }
        let collection = self.collection_name();
        if BUILT_IN_COLLECTIONS
            .iter()
            .any(|b| b.eq_ignore_ascii_case(&collection))
        {
            return Err(CoreError::invalid_kind(format!(
                "{collection} is a built-in collection"
            )));
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        Element::new(KIND_ELEMENT)
            .with_attr("Name", &self.element_name)
            .with_attr("IdField", &self.id_field)
    }

    fn from_element(element: &Element) -> Option<Self> {
        Some(Self::new(element.attr("Name")?, element.attr("IdField")?))
    }
}

/// Letters, digits, `_`, `-` and `.`, not starting with a digit, `-` or `.`.
///
/// Stricter than XML itself so the name is also a portable file name.
pub(crate) fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    officedb_codec::is_xml_name(name)
        && (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Kinds persisted in a company's Others collection.
///
/// Entries missing an attribute or failing validation are skipped.
pub(crate) fn durable_kinds(others: &CollectionStore) -> Vec<ExtensionKind> {
    let Some(list) = others.child(KINDS_CONTAINER) else {
        return Vec::new();
    };
    list.children_named(KIND_ELEMENT)
        .filter_map(|e| match ExtensionKind::from_element(e) {
            Some(kind) if kind.validate().is_ok() => Some(kind),
            _ => {
                warn!(entry = ?e.attributes(), "skipping malformed extension kind entry");
                None
            }
        })
        .collect()
}

/// Adds a kind to a company's durable list unless it is already there.
pub(crate) fn persist_kind(others: &CollectionStore, kind: &ExtensionKind) -> CoreResult<()> {
    let mut list = others
        .child(KINDS_CONTAINER)
        .unwrap_or_else(|| Element::new(KINDS_CONTAINER));
    let known = list
        .children_named(KIND_ELEMENT)
        .any(|e| e.attr("Name") == Some(kind.element_name()));
    if known {
        return Ok(());
    }
    list.push(kind.to_element());
    others.set_child(list)
}

/// Process-lifetime list of registered kinds, in registration order.
#[derive(Debug, Default)]
pub(crate) struct ExtensionRegistry {
    kinds: RwLock<Vec<ExtensionKind>>,
}

impl ExtensionRegistry {
    /// Adds a kind. Returns false if a kind with the same element name is
    /// already registered.
    pub(crate) fn register(&self, kind: &ExtensionKind) -> bool {
        let mut kinds = self.kinds.write();
        if kinds.iter().any(|k| k.element_name == kind.element_name) {
            return false;
        }
        kinds.push(kind.clone());
        true
    }

    /// Snapshot of all registered kinds.
    pub(crate) fn all(&self) -> Vec<ExtensionKind> {
        self.kinds.read().clone()
    }
}
