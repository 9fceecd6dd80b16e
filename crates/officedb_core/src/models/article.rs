//! Articles and their list projection.

use super::common::Money;
use super::settings::{TaxClass, Unit};
use crate::collection::{NamedRecord, RecordCodec};
use officedb_codec::{CodecResult, Element};
use serde::{Deserialize, Serialize};

/// A sellable article.
///
/// Unit and tax class are persisted by name only. Reading through the
/// database resolves them against the company's settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Article id.
    pub article_id: String,
    /// Description.
    pub description: String,
    /// Net price per unit.
    pub price: Money,
    /// Unit of quantity.
    pub unit: Unit,
    /// Tax class.
    pub tax_class: TaxClass,
}

impl Article {
    /// Creates an article with default price, unit and tax class.
    pub fn new(article_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            article_id: article_id.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}

impl RecordCodec for Article {
    fn to_element(&self) -> Element {
        Element::new(Self::ELEMENT_NAME)
            .with_text_child(Self::ID_FIELD, &self.article_id)
            .with_text_child("ArticleDescription", &self.description)
            .with_child(self.price.to_element("Price"))
            .with_text_child("ArticleUnit", &self.unit.name)
            .with_text_child("TaxClass", &self.tax_class.name)
    }

    fn from_element(element: &Element) -> CodecResult<Self> {
        element.expect_name(Self::ELEMENT_NAME)?;
        let price = match element.child("Price") {
            Some(price) => Money::from_element(price)?,
            None => Money::default(),
        };
        Ok(Self {
            article_id: element.required_text(Self::ID_FIELD)?.to_string(),
            description: element
                .child_text("ArticleDescription")
                .unwrap_or_default()
                .to_string(),
            price,
            unit: Unit::named(element.child_text("ArticleUnit").unwrap_or_default()),
            tax_class: TaxClass::named(element.child_text("TaxClass").unwrap_or_default()),
        })
    }
}

impl NamedRecord for Article {
    const ELEMENT_NAME: &'static str = "Article";
    const ID_FIELD: &'static str = "ArticleID";

    fn record_id(&self) -> String {
        self.article_id.clone()
    }
}

/// Article fields shown in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticlePreview {
    /// Article id.
    pub article_id: String,
    /// Description.
    pub description: String,
    /// Net price per unit.
    pub price: Money,
    /// Unit name.
    pub unit: String,
}

impl From<&Article> for ArticlePreview {
    fn from(article: &Article) -> Self {
        Self {
            article_id: article.article_id.clone(),
            description: article.description.clone(),
            price: article.price.clone(),
            unit: article.unit.name.clone(),
        }
    }
}
