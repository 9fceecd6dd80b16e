//! Record codec traits for typed collections.

use crate::collection::store::RecordSpec;
use officedb_codec::{CodecResult, Element};

/// Trait for types that convert to and from an [`Element`].
///
/// Decoding must accept everything encoding produces, so that a record
/// read back after a save compares equal to the saved record.
///
/// # Example
///
/// ```rust
/// use officedb_codec::{CodecResult, Element};
/// use officedb_core::{NamedRecord, RecordCodec};
///
/// struct Project {
///     id: String,
///     title: String,
/// }
///
/// impl RecordCodec for Project {
///     fn to_element(&self) -> Element {
///         Element::new(Self::ELEMENT_NAME)
///             .with_text_child(Self::ID_FIELD, &self.id)
///             .with_text_child("Title", &self.title)
///     }
///
///     fn from_element(element: &Element) -> CodecResult<Self> {
///         element.expect_name(Self::ELEMENT_NAME)?;
///         Ok(Self {
///             id: element.required_text(Self::ID_FIELD)?.to_string(),
///             title: element.child_text("Title").unwrap_or_default().to_string(),
///         })
///     }
/// }
///
/// impl NamedRecord for Project {
///     const ELEMENT_NAME: &'static str = "Project";
///     const ID_FIELD: &'static str = "ProjectID";
///
///     fn record_id(&self) -> String {
///         self.id.clone()
///     }
/// }
/// ```
pub trait RecordCodec: Sized {
    /// Encodes the record as an element tree.
    fn to_element(&self) -> Element;

    /// Decodes a record from an element tree.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or malformed.
    fn from_element(element: &Element) -> CodecResult<Self>;
}

/// A record stored under a fixed element name and keyed by an id field.
pub trait NamedRecord: RecordCodec {
    /// Element name of one record.
    const ELEMENT_NAME: &'static str;

    /// Name of the child element holding the id.
    const ID_FIELD: &'static str;

    /// Wrapping list element, for records nested below the collection root.
    const CONTAINER: Option<&'static str> = None;

    /// The record's id.
    fn record_id(&self) -> String;

    /// Address of records of this type inside a collection.
    fn spec() -> RecordSpec {
        match Self::CONTAINER {
            Some(container) => RecordSpec::nested(container, Self::ELEMENT_NAME, Self::ID_FIELD),
            None => RecordSpec::new(Self::ELEMENT_NAME, Self::ID_FIELD),
        }
    }
}
