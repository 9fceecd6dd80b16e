//! Documents (invoices, offers, ...) and their previews.
//!
//! The Documents collection is heterogeneous: the element name of each
//! record is its document type, and ids are unique per type only.

use super::common::FieldValue;
use super::customer::CustomerPreview;
use crate::collection::{RecordCodec, RecordSpec};
use chrono::NaiveDate;
use officedb_codec::{CodecError, CodecResult, Element};
use serde::Serialize;
use std::collections::BTreeMap;

/// Id field of every document type.
pub const DOCUMENT_ID_FIELD: &str = "ID";
const DATE_FIELD: &str = "Date";

/// Parses an ISO date, tolerating a time suffix.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| text.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

fn required_date(element: &Element) -> CodecResult<NaiveDate> {
    let text = element.required_text(DATE_FIELD)?;
    parse_date(text).ok_or_else(|| CodecError::invalid_value(DATE_FIELD, text))
}

fn customer_element(element: &Element) -> Option<&Element> {
    element
        .child(CustomerPreview::ELEMENT_NAME)
        .or_else(|| element.child(CustomerPreview::LEGACY_ELEMENT_NAME))
}

fn is_base_field(name: &str) -> bool {
    name == DOCUMENT_ID_FIELD
        || name == DATE_FIELD
        || name == CustomerPreview::ELEMENT_NAME
        || name == CustomerPreview::LEGACY_ELEMENT_NAME
}

/// Address of all documents of one type in the Documents collection.
pub fn document_spec(document_type: &str) -> RecordSpec {
    RecordSpec::new(document_type, DOCUMENT_ID_FIELD)
}

/// A full document.
///
/// `fields` carries the type-specific children (items, totals, notes, ...)
/// untouched. `extra` is filled by enrichment parsers on load and is never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Document type, also the element name.
    pub document_type: String,
    /// Id, unique within the type.
    pub document_id: String,
    /// Document date.
    pub date: NaiveDate,
    /// Customer snapshot taken when the document was written.
    pub customer_preview: Option<CustomerPreview>,
    /// Type-specific children in stored order.
    #[serde(skip)]
    pub fields: Vec<Element>,
    /// Values contributed by enrichment parsers.
    pub extra: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Creates a document with no customer and no fields.
    pub fn new(
        document_type: impl Into<String>,
        document_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            document_id: document_id.into(),
            date,
            customer_preview: None,
            fields: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    /// First type-specific field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Element> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Replaces or appends a type-specific field.
    ///
    /// Returns false and leaves the document unchanged if `field` is named
    /// like one of the base fields (`ID`, `Date`, the customer preview);
    /// those are set through the struct members instead.
    pub fn set_field(&mut self, field: Element) -> bool {
        if is_base_field(field.name()) {
            return false;
        }
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(slot) => *slot = field,
            None => self.fields.push(field),
        }
        true
    }
}

impl RecordCodec for Document {
    fn to_element(&self) -> Element {
        let mut element = Element::new(&self.document_type)
            .with_text_child(DOCUMENT_ID_FIELD, &self.document_id)
            .with_text_child(DATE_FIELD, self.date.format("%Y-%m-%d").to_string());
        if let Some(customer) = &self.customer_preview {
            element.push(customer.to_element());
        }
        for field in self.fields.iter().filter(|f| !is_base_field(f.name())) {
            element.push(field.clone());
        }
        element
    }

    fn from_element(element: &Element) -> CodecResult<Self> {
        let customer_preview = customer_element(element)
            .map(CustomerPreview::from_element)
            .transpose()?;
        Ok(Self {
            document_type: element.name().to_string(),
            document_id: element.required_text(DOCUMENT_ID_FIELD)?.to_string(),
            date: required_date(element)?,
            customer_preview,
            fields: element
                .children()
                .iter()
                .filter(|c| !is_base_field(c.name()))
                .cloned()
                .collect(),
            extra: BTreeMap::new(),
        })
    }
}

/// Document fields shown in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentPreview {
    /// Document type.
    pub document_type: String,
    /// Id, unique within the type.
    pub document_id: String,
    /// Document date.
    pub date: NaiveDate,
    /// Customer snapshot.
    pub customer: Option<CustomerPreview>,
    /// Values contributed by enrichment parsers.
    pub extra: BTreeMap<String, FieldValue>,
}

impl DocumentPreview {
    /// Projects a stored document element.
    ///
    /// # Errors
    ///
    /// Returns an error if the id or date is missing or malformed.
    pub fn from_element(element: &Element) -> CodecResult<Self> {
        Ok(Self {
            document_type: element.name().to_string(),
            document_id: element.required_text(DOCUMENT_ID_FIELD)?.to_string(),
            date: required_date(element)?,
            customer: customer_element(element)
                .map(CustomerPreview::from_element)
                .transpose()?,
            extra: BTreeMap::new(),
        })
    }
}

impl From<&Document> for DocumentPreview {
    fn from(document: &Document) -> Self {
        Self {
            document_type: document.document_type.clone(),
            document_id: document.document_id.clone(),
            date: document.date,
            customer: document.customer_preview.clone(),
            extra: document.extra.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice() -> Document {
        let mut doc = Document::new("Invoice", "1000", date(2024, 3, 1));
        doc.customer_preview = Some(CustomerPreview {
            customer_id: "1000".into(),
            display_name: "Jane Doe".into(),
            address: "Springfield".into(),
        });
        doc.set_field(Element::new("Items").with_child(
            Element::new("Item").with_text_child("ArticleID", "1000"),
        ));
        doc
    }

    #[test]
    fn element_name_is_document_type() {
        let element = invoice().to_element();
        assert_eq!(element.name(), "Invoice");
        assert_eq!(element.child_text("Date"), Some("2024-03-01"));
        assert!(element.child("CustomerPreview").is_some());
    }

    #[test]
    fn round_trip() {
        let doc = invoice();
        assert_eq!(Document::from_element(&doc.to_element()).unwrap(), doc);
    }

    #[test]
    fn reads_legacy_customer_element() {
        let element = Element::new("Offer")
            .with_text_child("ID", "5")
            .with_text_child("Date", "2023-12-24")
            .with_child(Element::new("PreviewCustomer").with_text_child("CustomerID", "9"));

        let doc = Document::from_element(&element).unwrap();
        assert_eq!(doc.customer_preview.unwrap().customer_id, "9");
        assert!(doc.fields.is_empty());

        let preview = DocumentPreview::from_element(&element).unwrap();
        assert_eq!(preview.customer.unwrap().customer_id, "9");
    }

    #[test]
    fn date_with_time_suffix() {
        assert_eq!(parse_date("2024-03-01T10:15:00"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date(" 2024-03-01 "), Some(date(2024, 3, 1)));
        assert_eq!(parse_date("01.03.2024"), None);
        assert_eq!(parse_date("2024"), None);
    }

    #[test]
    fn bad_date_is_invalid_value() {
        let element = Element::new("Invoice")
            .with_text_child("ID", "1")
            .with_text_child("Date", "yesterday");
        assert!(matches!(
            DocumentPreview::from_element(&element),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn set_field_replaces() {
        let mut doc = invoice();
        assert!(doc.set_field(Element::text_node("Items", "")));
        assert_eq!(doc.fields.len(), 1);
        assert!(doc.field("Items").unwrap().children().is_empty());
    }

    #[test]
    fn set_field_ignores_base_fields() {
        let mut doc = invoice();
        assert!(!doc.set_field(Element::text_node("ID", "9999")));
        assert!(!doc.set_field(Element::text_node("Date", "1999-01-01")));
        assert!(!doc.set_field(Element::new("CustomerPreview")));
        assert!(!doc.set_field(Element::new("PreviewCustomer")));
        assert_eq!(doc.fields.len(), 1);

        doc.fields.push(Element::text_node("ID", "9999"));
        let element = doc.to_element();
        assert_eq!(element.children_named("ID").count(), 1);
        assert_eq!(element.child_text("ID"), Some("1000"));
        assert_eq!(Document::from_element(&element).unwrap(), invoice());
    }
}
