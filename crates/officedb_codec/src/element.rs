//! The structured tree every record is converted to and from.

use crate::error::{CodecError, CodecResult};
use std::str::FromStr;

/// A named node with ordered attributes, text, and ordered children.
///
/// An element carries either text or children, never both. Element and
/// attribute order is preserved through encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates an element holding only text.
    pub fn text_node(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a text-only child element.
    #[must_use]
    pub fn with_text_child(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_child(Element::text_node(name, text))
    }

    /// Element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content (empty if none).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Looks up an attribute value.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing any previous value in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Mutable access to the child list.
    pub fn children_mut(&mut self) -> &mut Vec<Element> {
        &mut self.children
    }

    /// Returns true if the element has neither text nor children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.children.is_empty()
    }

    /// Appends a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Mutable reference to the first child with the given name.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// All children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child with the given name.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(Element::text)
    }

    /// Replaces the first child with the same name, or appends it.
    pub fn replace_child(&mut self, child: Element) {
        match self.children.iter_mut().find(|c| c.name == child.name) {
            Some(slot) => *slot = child,
            None => self.children.push(child),
        }
    }

    /// Returns the first child with the given name, appending an empty one
    /// if it does not exist yet.
    pub fn child_or_insert(&mut self, name: &str) -> &mut Element {
        let index = match self.children.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.children.push(Element::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// The required child with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingElement`] if absent.
    pub fn required_child(&self, name: &str) -> CodecResult<&Element> {
        self.child(name)
            .ok_or_else(|| CodecError::missing_element(&self.name, name))
    }

    /// Text of the required child with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingElement`] if absent.
    pub fn required_text(&self, name: &str) -> CodecResult<&str> {
        self.required_child(name).map(Element::text)
    }

    /// Parses the text of a required child.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingElement`] if absent or
    /// [`CodecError::InvalidValue`] if the text does not parse.
    pub fn parse_child<T: FromStr>(&self, name: &str) -> CodecResult<T> {
        let text = self.required_text(name)?;
        text.trim()
            .parse()
            .map_err(|_| CodecError::invalid_value(name, text))
    }

    /// Parses the text of an optional child, falling back to `default`
    /// when the child is absent or empty.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] if present text does not parse.
    pub fn parse_child_or<T: FromStr>(&self, name: &str, default: T) -> CodecResult<T> {
        match self.child_text(name).map(str::trim) {
            None | Some("") => Ok(default),
            Some(text) => text
                .parse()
                .map_err(|_| CodecError::invalid_value(name, text)),
        }
    }

    /// Fails unless this element has the expected name.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnexpectedElement`] on mismatch.
    pub fn expect_name(&self, expected: &str) -> CodecResult<()> {
        if self.name == expected {
            Ok(())
        } else {
            Err(CodecError::unexpected_element(expected, &self.name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Element {
        Element::new("Article")
            .with_text_child("ArticleID", "1000")
            .with_text_child("ArticleDescription", "Screws")
            .with_child(Element::text_node("Price", "250").with_attr("Currency", "EUR"))
    }

    #[test]
    fn child_lookup() {
        let e = article();
        assert_eq!(e.child_text("ArticleID"), Some("1000"));
        assert_eq!(e.child("Price").and_then(|p| p.attr("Currency")), Some("EUR"));
        assert!(e.child("Missing").is_none());
    }

    #[test]
    fn replace_child_keeps_position() {
        let mut e = article();
        e.replace_child(Element::text_node("ArticleDescription", "Nails"));

        let names: Vec<_> = e.children().iter().map(Element::name).collect();
        assert_eq!(names, ["ArticleID", "ArticleDescription", "Price"]);
        assert_eq!(e.child_text("ArticleDescription"), Some("Nails"));
    }

    #[test]
    fn child_or_insert_appends_once() {
        let mut e = Element::new("Settings");
        e.child_or_insert("TaxClasses").push(Element::new("TaxClass"));
        e.child_or_insert("TaxClasses").push(Element::new("TaxClass"));

        assert_eq!(e.children().len(), 1);
        assert_eq!(e.children()[0].children().len(), 2);
    }

    #[test]
    fn set_attr_overwrites() {
        let mut e = Element::new("Money").with_attr("Currency", "EUR");
        e.set_attr("Currency", "USD");
        assert_eq!(e.attributes().len(), 1);
        assert_eq!(e.attr("Currency"), Some("USD"));
    }

    #[test]
    fn required_errors_name_the_parent() {
        let e = article();
        assert_eq!(
            e.required_text("Unit"),
            Err(CodecError::missing_element("Article", "Unit"))
        );
    }

    #[test]
    fn parse_child_values() {
        let e = article();
        assert_eq!(e.parse_child::<u64>("ArticleID").unwrap(), 1000);
        assert_eq!(
            e.parse_child::<u64>("ArticleDescription"),
            Err(CodecError::invalid_value("ArticleDescription", "Screws"))
        );
        assert_eq!(e.parse_child_or::<u32>("Decimals", 2).unwrap(), 2);
    }

    #[test]
    fn expect_name_mismatch() {
        let e = Element::new("Customer");
        assert!(e.expect_name("Customer").is_ok());
        assert_eq!(
            e.expect_name("Article"),
            Err(CodecError::unexpected_element("Article", "Customer"))
        );
    }
}
