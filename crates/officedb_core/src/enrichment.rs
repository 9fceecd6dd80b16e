//! Document enrichment.
//!
//! Parsers bound to a document type contribute extra fields to documents
//! and previews of that type after the base record is decoded. Parsers run
//! in registration order; a failing parser is logged and skipped, so a load
//! may end up partially enriched.

use crate::models::{Document, DocumentPreview};
use crate::view::StoreView;
use officedb_codec::Element;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

/// Result of a parser invocation.
pub type ParserResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// An external parser for one document type.
///
/// Both hooks default to doing nothing, so a parser implements only the
/// ones it needs. Values are written to the `extra` map of the target;
/// when two parsers write the same key, the later one wins.
///
/// # Example
///
/// ```rust
/// use officedb_codec::Element;
/// use officedb_core::{DocumentParser, DocumentPreview, FieldValue, ParserResult};
///
/// struct InvoiceTotal;
///
/// impl DocumentParser for InvoiceTotal {
///     fn document_type(&self) -> &str {
///         "Invoice"
///     }
///
///     fn parse_preview(&self, preview: &mut DocumentPreview, raw: &Element) -> ParserResult {
///         let total: i64 = raw.child_text("Total").unwrap_or("0").parse()?;
///         preview.extra.insert("Total".into(), FieldValue::Integer(total));
///         Ok(())
///     }
/// }
/// ```
pub trait DocumentParser: Send + Sync {
    /// Document type (element name) this parser handles.
    fn document_type(&self) -> &str;

    /// Adds fields to a preview decoded from `raw`.
    fn parse_preview(&self, preview: &mut DocumentPreview, raw: &Element) -> ParserResult {
        let _ = (preview, raw);
        Ok(())
    }

    /// Adds fields to a full document decoded from `raw`.
    ///
    /// `store` gives read access to the company's other collections.
    fn parse_document(
        &self,
        document: &mut Document,
        raw: &Element,
        store: &StoreView<'_>,
    ) -> ParserResult {
        let _ = (document, raw, store);
        Ok(())
    }
}

/// Registered parsers, in registration order.
#[derive(Default)]
pub(crate) struct EnrichmentPipeline {
    parsers: RwLock<Vec<Arc<dyn DocumentParser>>>,
}

impl EnrichmentPipeline {
    pub(crate) fn register(&self, parser: Arc<dyn DocumentParser>) {
        self.parsers.write().push(parser);
    }

    pub(crate) fn len(&self) -> usize {
        self.parsers.read().len()
    }

    /// Snapshot of the parsers for one type, so parsers run without the
    /// registry lock held.
    fn matching(&self, document_type: &str) -> Vec<Arc<dyn DocumentParser>> {
        self.parsers
            .read()
            .iter()
            .filter(|p| p.document_type() == document_type)
            .cloned()
            .collect()
    }

    pub(crate) fn enrich_preview(&self, preview: &mut DocumentPreview, raw: &Element) {
        for parser in self.matching(&preview.document_type) {
            if let Err(e) = parser.parse_preview(preview, raw) {
                warn!(
                    document_type = %preview.document_type,
                    id = %preview.document_id,
                    error = %e,
                    "preview parser failed"
                );
            }
        }
    }

    pub(crate) fn enrich_document(&self, document: &mut Document, raw: &Element, store: &StoreView<'_>) {
        for parser in self.matching(&document.document_type) {
            if let Err(e) = parser.parse_document(document, raw, store) {
                warn!(
                    document_type = %document.document_type,
                    id = %document.document_id,
                    error = %e,
                    "document parser failed"
                );
            }
        }
    }
}

impl std::fmt::Debug for EnrichmentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentPipeline")
            .field("parsers", &self.len())
            .finish()
    }
}
