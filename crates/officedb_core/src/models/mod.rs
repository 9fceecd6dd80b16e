//! Built-in record models.

mod article;
mod common;
mod customer;
mod document;
mod settings;

pub use article::{Article, ArticlePreview};
pub use common::{Address, FieldValue, Money, DEFAULT_CURRENCY};
pub use customer::{Customer, CustomerPreview};
pub use document::{document_spec, parse_date, Document, DocumentPreview, DOCUMENT_ID_FIELD};
pub use settings::{PaymentMethod, SettingsBlob, TaxClass, Unit};
