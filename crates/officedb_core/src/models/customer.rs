//! Customers and their list projection.

use super::common::Address;
use super::settings::PaymentMethod;
use crate::collection::{NamedRecord, RecordCodec};
use officedb_codec::{CodecResult, Element};
use serde::{Deserialize, Serialize};

/// A customer.
///
/// The default payment method is persisted by name and resolved when the
/// customer is read through the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer id.
    pub customer_id: String,
    /// Name shown in lists and on documents.
    pub display_name: String,
    /// Billing address.
    pub main_address: Address,
    /// Payment method preselected on new documents.
    pub default_payment_method: PaymentMethod,
}

impl Customer {
    /// Creates a customer with an empty address.
    pub fn new(customer_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }
}

impl RecordCodec for Customer {
    fn to_element(&self) -> Element {
        Element::new(Self::ELEMENT_NAME)
            .with_text_child(Self::ID_FIELD, &self.customer_id)
            .with_text_child("DisplayName", &self.display_name)
            .with_child(self.main_address.to_element("MainAddress"))
            .with_text_child("DefaultPaymentMethode", &self.default_payment_method.name)
    }

    fn from_element(element: &Element) -> CodecResult<Self> {
        element.expect_name(Self::ELEMENT_NAME)?;
        Ok(Self {
            customer_id: element.required_text(Self::ID_FIELD)?.to_string(),
            display_name: element.child_text("DisplayName").unwrap_or_default().to_string(),
            main_address: element
                .child("MainAddress")
                .map(Address::from_element)
                .unwrap_or_default(),
            default_payment_method: PaymentMethod::named(
                element.child_text("DefaultPaymentMethode").unwrap_or_default(),
            ),
        })
    }
}

impl NamedRecord for Customer {
    const ELEMENT_NAME: &'static str = "Customer";
    const ID_FIELD: &'static str = "CustomerID";

    fn record_id(&self) -> String {
        self.customer_id.clone()
    }
}

/// Customer fields shown in lists and embedded in documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPreview {
    /// Customer id.
    pub customer_id: String,
    /// Display name.
    pub display_name: String,
    /// Main address on one line.
    pub address: String,
}

impl CustomerPreview {
    /// Element name written inside documents.
    pub const ELEMENT_NAME: &'static str = "CustomerPreview";
    /// Element name found in older document files.
    pub const LEGACY_ELEMENT_NAME: &'static str = "PreviewCustomer";
}

impl RecordCodec for CustomerPreview {
    fn to_element(&self) -> Element {
        Element::new(Self::ELEMENT_NAME)
            .with_text_child("CustomerID", &self.customer_id)
            .with_text_child("DisplayName", &self.display_name)
            .with_text_child("Address", &self.address)
    }

    /// Accepts both the current and the legacy element name.
    fn from_element(element: &Element) -> CodecResult<Self> {
        if element.name() != Self::LEGACY_ELEMENT_NAME {
            element.expect_name(Self::ELEMENT_NAME)?;
        }
        let field = |name: &str| element.child_text(name).unwrap_or_default().to_string();
        // Very old files store just the display text.
        if element.children().is_empty() {
            return Ok(Self {
                display_name: element.text().to_string(),
                ..Self::default()
            });
        }
        Ok(Self {
            customer_id: field("CustomerID"),
            display_name: field("DisplayName"),
            address: field("Address"),
        })
    }
}

impl From<&Customer> for CustomerPreview {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id.clone(),
            display_name: customer.display_name.clone(),
            address: customer.main_address.one_line(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            main_address: Address {
                street: "Main St 1".into(),
                city: "Springfield".into(),
                ..Address::default()
            },
            default_payment_method: PaymentMethod::named("Invoice 14 days"),
            ..Customer::new("1000", "Jane Doe")
        }
    }

    #[test]
    fn round_trip() {
        let c = customer();
        let element = c.to_element();
        assert_eq!(element.child_text("DefaultPaymentMethode"), Some("Invoice 14 days"));
        assert_eq!(Customer::from_element(&element).unwrap(), c);
    }

    #[test]
    fn preview_from_customer() {
        let preview = CustomerPreview::from(&customer());
        assert_eq!(preview.customer_id, "1000");
        assert_eq!(preview.address, "Main St 1, Springfield");
    }

    #[test]
    fn preview_accepts_legacy_name() {
        let element = Element::new("PreviewCustomer")
            .with_text_child("CustomerID", "7")
            .with_text_child("DisplayName", "Old");
        let preview = CustomerPreview::from_element(&element).unwrap();
        assert_eq!(preview.customer_id, "7");
        assert_eq!(preview.display_name, "Old");
    }

    #[test]
    fn preview_accepts_plain_text() {
        let element = Element::text_node("CustomerPreview", "Jane Doe");
        let preview = CustomerPreview::from_element(&element).unwrap();
        assert_eq!(preview.display_name, "Jane Doe");
        assert!(preview.customer_id.is_empty());
    }

    #[test]
    fn preview_rejects_other_elements() {
        assert!(CustomerPreview::from_element(&Element::new("Customer")).is_err());
    }
}
