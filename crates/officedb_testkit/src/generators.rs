//! Property-based test generators using proptest.
//!
//! Record strategies produce values the XML encoding accepts: text may be
//! empty, carry markup characters, CR, tab, surrounding whitespace and any
//! non-ASCII character, but never a character XML 1.0 forbids. The raw
//! strategies also produce names and text the encoder must refuse.

use chrono::NaiveDate;
use officedb_codec::{is_xml_char, Element};
use officedb_core::{
    Address, Article, CompanyInfo, Customer, Document, Money, PaymentMethod, TaxClass, Unit,
};
use proptest::prelude::*;

/// Document types used by generated documents.
pub const DOCUMENT_TYPES: [&str; 3] = ["Invoice", "Offer", "DeliveryNote"];

/// Strategy for numeric record ids.
pub fn numeric_id_strategy() -> impl Strategy<Value = String> {
    (1000u64..1_000_000).prop_map(|n| n.to_string())
}

/// Strategy for field text the encoder accepts.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        3 => prop::string::string_regex(
            "[ \t\r\n]{0,2}[A-Za-z0-9&<>'\".,-]{1,12}( [A-Za-z0-9&<>'\".,-]{1,12}){0,2}[ \t\r\n]{0,2}",
        )
        .expect("Invalid regex"),
        3 => raw_text_strategy().prop_map(|text| text.chars().filter(|c| is_xml_char(*c)).collect()),
    ]
}

/// Strategy for arbitrary text, including control characters.
pub fn raw_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => prop::char::any(),
            1 => prop::sample::select(vec!['\r', '\n', '\t', ' ', '&', '<', '\u{C}', '\u{0}']),
        ],
        0..16,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for element and attribute names, mostly but not always valid.
pub fn raw_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => prop::string::string_regex("[A-Za-z_\u{C0}-\u{FF}][A-Za-z0-9_.-]{0,8}")
            .expect("Invalid regex"),
        1 => prop::string::string_regex("[A-Za-z0-9 :<_-]{0,6}").expect("Invalid regex"),
        1 => Just("xmlns".to_string()),
    ]
}

fn attributes_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (
            raw_name_strategy(),
            prop_oneof![4 => text_strategy(), 1 => raw_text_strategy()],
        ),
        0..3,
    )
}

fn with_attributes(element: Element, attributes: Vec<(String, String)>) -> Element {
    attributes
        .into_iter()
        .fold(element, |e, (key, value)| e.with_attr(key, value))
}

/// Strategy for element trees with text on leaves only.
///
/// Names, attribute values and text are occasionally invalid, so only
/// some trees can be encoded.
pub fn element_strategy() -> impl Strategy<Value = Element> {
    let leaf = (
        raw_name_strategy(),
        attributes_strategy(),
        prop_oneof![8 => text_strategy(), 1 => raw_text_strategy()],
    )
        .prop_map(|(name, attributes, text)| {
            with_attributes(Element::text_node(name, text), attributes)
        });
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            raw_name_strategy(),
            attributes_strategy(),
            prop::collection::vec(inner, 1..4),
        )
            .prop_map(|(name, attributes, children)| {
                children
                    .into_iter()
                    .fold(with_attributes(Element::new(name), attributes), Element::with_child)
            })
    })
}

/// Strategy for reference names (units, tax classes, payment methods).
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{2,10}").expect("Invalid regex")
}

/// Strategy for type-specific document field names.
///
/// Never collides with the base fields (`ID`, `Date`, customer preview).
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("Field[A-Z][a-z]{1,8}").expect("Invalid regex")
}

/// Strategy for company ids usable as directory names.
pub fn company_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9_-]{0,15}").expect("Invalid regex")
}

/// Strategy for amounts.
pub fn money_strategy() -> impl Strategy<Value = Money> {
    (
        -1_000_000_000i64..1_000_000_000,
        prop::sample::select(vec!["EUR", "USD", "CHF"]),
    )
        .prop_map(|(amount, currency)| Money::new(amount, currency))
}

/// Strategy for document dates.
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2040, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).expect("day 1..=28 is valid in every month")
    })
}

/// Strategy for articles as they read back from storage (references by name).
pub fn article_strategy() -> impl Strategy<Value = Article> {
    (
        numeric_id_strategy(),
        text_strategy(),
        money_strategy(),
        name_strategy(),
        name_strategy(),
    )
        .prop_map(|(id, description, price, unit, tax_class)| Article {
            price,
            unit: Unit::named(unit),
            tax_class: TaxClass::named(tax_class),
            ..Article::new(id, description)
        })
}

/// Strategy for addresses.
pub fn address_strategy() -> impl Strategy<Value = Address> {
    prop::collection::vec(text_strategy(), 6).prop_map(|lines| Address {
        company: lines[0].clone(),
        name: lines[1].clone(),
        street: lines[2].clone(),
        zip: lines[3].clone(),
        city: lines[4].clone(),
        country: lines[5].clone(),
    })
}

/// Strategy for customers as they read back from storage.
pub fn customer_strategy() -> impl Strategy<Value = Customer> {
    (
        numeric_id_strategy(),
        text_strategy(),
        address_strategy(),
        name_strategy(),
    )
        .prop_map(|(id, display_name, main_address, payment)| Customer {
            main_address,
            default_payment_method: PaymentMethod::named(payment),
            ..Customer::new(id, display_name)
        })
}

/// Strategy for documents with a few free-form fields.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    (
        prop::sample::select(DOCUMENT_TYPES.to_vec()),
        numeric_id_strategy(),
        date_strategy(),
        prop::collection::vec((field_name_strategy(), text_strategy()), 0..4),
    )
        .prop_map(|(document_type, id, date, fields)| {
            let mut document = Document::new(document_type, id, date);
            for (name, value) in fields {
                document.set_field(Element::text_node(name, value));
            }
            document
        })
}

/// Strategy for company descriptors.
pub fn company_strategy() -> impl Strategy<Value = CompanyInfo> {
    (
        company_id_strategy(),
        text_strategy(),
        prop::collection::btree_map(name_strategy(), text_strategy(), 0..3),
    )
        .prop_map(|(id, name, metadata)| CompanyInfo {
            metadata,
            ..CompanyInfo::new(id, name)
        })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 64,
            max_shrink_iters: 500,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    ///
    /// Every case of a store-level property touches the disk, so keep
    /// these small.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 16,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn text_is_encodable(text in text_strategy()) {
            prop_assert!(text.chars().all(is_xml_char));
        }

        #[test]
        fn company_ids_are_valid(id in company_id_strategy()) {
            prop_assert!(officedb_core::validate_company_id(&id).is_ok());
        }

        #[test]
        fn numeric_ids_parse(id in numeric_id_strategy()) {
            prop_assert!(id.parse::<u64>().is_ok());
        }
    }
}
