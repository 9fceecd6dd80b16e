//! Company settings stored in the Others collection.

use crate::collection::{NamedRecord, RecordCodec};
use crate::error::{CoreError, CoreResult};
use officedb_codec::{CodecResult, Element};
use serde::{Deserialize, Serialize};

/// A tax class, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxClass {
    /// Display name and key.
    pub name: String,
    /// Rate in basis points (1900 = 19 %).
    pub rate_basis_points: u32,
}

impl TaxClass {
    /// A tax class known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl RecordCodec for TaxClass {
    fn to_element(&self) -> Element {
        Element::new(Self::ELEMENT_NAME)
            .with_text_child("Name", &self.name)
            .with_text_child("Rate", self.rate_basis_points.to_string())
    }

    fn from_element(element: &Element) -> CodecResult<Self> {
        element.expect_name(Self::ELEMENT_NAME)?;
        Ok(Self {
            name: element.required_text("Name")?.to_string(),
            rate_basis_points: element.parse_child_or("Rate", 0)?,
        })
    }
}

impl NamedRecord for TaxClass {
    const ELEMENT_NAME: &'static str = "TaxClass";
    const ID_FIELD: &'static str = "Name";
    const CONTAINER: Option<&'static str> = Some("TaxClasses");

    fn record_id(&self) -> String {
        self.name.clone()
    }
}

/// A unit of quantity, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Display name and key.
    pub name: String,
    /// Abbreviation printed next to quantities.
    pub short_name: String,
    /// Decimal places used for quantities.
    pub decimals: u8,
}

impl Unit {
    /// A unit known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl RecordCodec for Unit {
    fn to_element(&self) -> Element {
        Element::new(Self::ELEMENT_NAME)
            .with_text_child("Name", &self.name)
            .with_text_child("ShortName", &self.short_name)
            .with_text_child("Decimals", self.decimals.to_string())
    }

    fn from_element(element: &Element) -> CodecResult<Self> {
        element.expect_name(Self::ELEMENT_NAME)?;
        Ok(Self {
            name: element.required_text("Name")?.to_string(),
            short_name: element.child_text("ShortName").unwrap_or_default().to_string(),
            decimals: element.parse_child_or("Decimals", 0)?,
        })
    }
}

impl NamedRecord for Unit {
    const ELEMENT_NAME: &'static str = "Unit";
    const ID_FIELD: &'static str = "Name";
    const CONTAINER: Option<&'static str> = Some("Units");

    fn record_id(&self) -> String {
        self.name.clone()
    }
}

/// A payment method, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Display name and key.
    pub name: String,
    /// Text printed on documents.
    pub text: String,
    /// Early payment discount in basis points.
    pub discount_basis_points: u32,
}

impl PaymentMethod {
    /// A payment method known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl RecordCodec for PaymentMethod {
    fn to_element(&self) -> Element {
        Element::new(Self::ELEMENT_NAME)
            .with_text_child("Name", &self.name)
            .with_text_child("Text", &self.text)
            .with_text_child("Discount", self.discount_basis_points.to_string())
    }

    fn from_element(element: &Element) -> CodecResult<Self> {
        element.expect_name(Self::ELEMENT_NAME)?;
        Ok(Self {
            name: element.required_text("Name")?.to_string(),
            text: element.child_text("Text").unwrap_or_default().to_string(),
            discount_basis_points: element.parse_child_or("Discount", 0)?,
        })
    }
}

impl NamedRecord for PaymentMethod {
    const ELEMENT_NAME: &'static str = "PaymentMethode";
    const ID_FIELD: &'static str = "Name";
    const CONTAINER: Option<&'static str> = Some("PaymentMethodes");

    fn record_id(&self) -> String {
        self.name.clone()
    }
}

/// Free-form key-value settings, persisted as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsBlob(pub serde_json::Map<String, serde_json::Value>);

impl SettingsBlob {
    /// Element name inside Others.
    pub const ELEMENT_NAME: &'static str = "Settings";

    /// Creates an empty blob.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Sets a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Encodes the blob as JSON text in a `Settings` element.
    pub fn to_element(&self) -> CoreResult<Element> {
        let json = serde_json::to_string(&self.0)
            .map_err(|e| CoreError::invalid_settings(e.to_string()))?;
        Ok(Element::text_node(Self::ELEMENT_NAME, json))
    }

    /// Decodes the blob. Empty text is an empty blob.
    pub fn from_element(element: &Element) -> CoreResult<Self> {
        let text = element.text().trim();
        if text.is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(text)
            .map(Self)
            .map_err(|e| CoreError::invalid_settings(e.to_string()))
    }
}
