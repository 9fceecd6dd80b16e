//! Value types shared by several record models.

use chrono::NaiveDate;
use officedb_codec::{CodecError, CodecResult, Element};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency used when a stored amount carries none.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// An amount in minor currency units.
///
/// Stored as `<Price Currency="EUR">1250</Price>`; the element name is
/// chosen by the owning record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units (cents).
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl Money {
    /// Creates an amount.
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Encodes the amount under the given element name.
    #[must_use]
    pub fn to_element(&self, name: &str) -> Element {
        Element::text_node(name, self.amount.to_string()).with_attr("Currency", &self.currency)
    }

    /// Decodes an amount from any element.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] if the text is not an integer.
    pub fn from_element(element: &Element) -> CodecResult<Self> {
        let text = element.text().trim();
        let amount = text
            .parse()
            .map_err(|_| CodecError::invalid_value(element.name(), text))?;
        Ok(Self {
            amount,
            currency: element
                .attr("Currency")
                .unwrap_or(DEFAULT_CURRENCY)
                .to_string(),
        })
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::new(0, DEFAULT_CURRENCY)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        write!(f, "{sign}{}.{:02} {}", abs / 100, abs % 100, self.currency)
    }
}

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Company line.
    pub company: String,
    /// Contact name.
    pub name: String,
    /// Street and number.
    pub street: String,
    /// Postal code.
    pub zip: String,
    /// City.
    pub city: String,
    /// Country.
    pub country: String,
}

impl Address {
    const FIELDS: [&'static str; 6] = ["Company", "Name", "Street", "ZIP", "City", "Country"];

    /// The address on one line, leaving out empty parts.
    #[must_use]
    pub fn one_line(&self) -> String {
        let town = format!("{} {}", self.zip, self.city);
        [
            self.company.as_str(),
            self.name.as_str(),
            self.street.as_str(),
            town.trim(),
            self.country.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Encodes the address under the given element name.
    #[must_use]
    pub fn to_element(&self, name: &str) -> Element {
        let values = [
            &self.company,
            &self.name,
            &self.street,
            &self.zip,
            &self.city,
            &self.country,
        ];
        Self::FIELDS
            .iter()
            .zip(values)
            .fold(Element::new(name), |e, (field, value)| {
                e.with_text_child(*field, value.as_str())
            })
    }

    /// Decodes an address. Missing lines are empty.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let line = |field: &str| element.child_text(field).unwrap_or_default().to_string();
        Self {
            company: line("Company"),
            name: line("Name"),
            street: line("Street"),
            zip: line("ZIP"),
            city: line("City"),
            country: line("Country"),
        }
    }
}

/// A value contributed to a document or preview by an enrichment parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldValue {
    /// Free text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Money amount.
    Amount(Money),
    /// Calendar date.
    Date(NaiveDate),
    /// Raw structured data.
    #[serde(serialize_with = "serialize_tree")]
    Tree(Element),
}

fn serialize_tree<S: serde::Serializer>(element: &Element, serializer: S) -> Result<S::Ok, S::Error> {
    let bytes = officedb_codec::to_xml(element).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&String::from_utf8_lossy(&bytes))
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Money> for FieldValue {
    fn from(value: Money) -> Self {
        Self::Amount(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Amount(money) => write!(f, "{money}"),
            Self::Date(date) => write!(f, "{date}"),
            Self::Tree(element) => write!(f, "<{}>", element.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_element_shape() {
        let money = Money::new(1250, "EUR");
        let element = money.to_element("Price");
        assert_eq!(element.name(), "Price");
        assert_eq!(element.text(), "1250");
        assert_eq!(element.attr("Currency"), Some("EUR"));
        assert_eq!(Money::from_element(&element).unwrap(), money);
    }

    #[test]
    fn money_defaults_currency() {
        let money = Money::from_element(&Element::text_node("Price", " 99 ")).unwrap();
        assert_eq!(money, Money::new(99, DEFAULT_CURRENCY));
    }

    #[test]
    fn money_rejects_decimal_text() {
        let result = Money::from_element(&Element::text_node("Price", "12.50"));
        assert!(matches!(result, Err(CodecError::InvalidValue { .. })));
    }

    #[test]
    fn money_display() {
        assert_eq!(Money::new(1250, "EUR").to_string(), "12.50 EUR");
        assert_eq!(Money::new(-5, "USD").to_string(), "-0.05 USD");
    }

    #[test]
    fn address_one_line_skips_empty_parts() {
        let address = Address {
            name: "Jane Doe".into(),
            street: "Main St 1".into(),
            zip: "12345".into(),
            city: "Springfield".into(),
            ..Address::default()
        };
        assert_eq!(address.one_line(), "Jane Doe, Main St 1, 12345 Springfield");
        assert_eq!(Address::default().one_line(), "");
    }

    #[test]
    fn address_round_trip() {
        let address = Address {
            company: "ACME".into(),
            city: "Berlin".into(),
            ..Address::default()
        };
        let element = address.to_element("MainAddress");
        assert_eq!(Address::from_element(&element), address);
    }

    #[test]
    fn field_value_conversions() {
        assert_eq!(FieldValue::from("x"), FieldValue::Text("x".into()));
        assert_eq!(FieldValue::from(3_i64), FieldValue::Integer(3));
        assert_eq!(FieldValue::from(Money::new(1, "EUR")).to_string(), "0.01 EUR");
    }
}
