//! XML decoder.

use crate::element::Element;
use crate::error::{CodecError, CodecResult};

/// Maximum element nesting accepted from input.
/// Record files are a handful of levels deep; anything deeper is rejected
/// before it can exhaust the stack.
const MAX_DEPTH: usize = 256;

/// Decode an element tree from UTF-8 XML bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not UTF-8 or not well-formed XML.
pub fn from_xml(bytes: &[u8]) -> CodecResult<Element> {
    let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
    from_xml_str(text)
}

/// Decode an element tree from XML text.
///
/// Whitespace-only text between child elements is dropped. Text of leaf
/// elements is kept verbatim.
///
/// # Errors
///
/// Returns an error if the text is not well-formed XML.
pub fn from_xml_str(text: &str) -> CodecResult<Element> {
    let doc = roxmltree::Document::parse(text)
        .map_err(|e| CodecError::decoding_failed(e.to_string()))?;
    convert(doc.root_element(), 0)
}

fn convert(node: roxmltree::Node<'_, '_>, depth: usize) -> CodecResult<Element> {
    if depth > MAX_DEPTH {
        return Err(CodecError::decoding_failed(format!(
            "nesting deeper than {MAX_DEPTH} levels"
        )));
    }

    let mut element = Element::new(node.tag_name().name());
    for attr in node.attributes() {
        element.set_attr(attr.name(), attr.value());
    }

    let has_children = node.children().any(|c| c.is_element());
    if has_children {
        for child in node.children().filter(roxmltree::Node::is_element) {
            element.push(convert(child, depth + 1)?);
        }
    } else {
        let text: String = node
            .children()
            .filter(roxmltree::Node::is_text)
            .filter_map(|c| c.text())
            .collect();
        element.set_text(text);
    }

    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_records() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<Articles>
  <Article>
    <ArticleID>1000</ArticleID>
    <Price Currency="EUR">250</Price>
  </Article>
</Articles>"#;

        let root = from_xml(xml.as_bytes()).unwrap();
        assert_eq!(root.name(), "Articles");
        assert_eq!(root.text(), "");

        let article = root.child("Article").unwrap();
        assert_eq!(article.child_text("ArticleID"), Some("1000"));
        assert_eq!(article.child("Price").unwrap().attr("Currency"), Some("EUR"));
    }

    #[test]
    fn unescapes_entities() {
        let root = from_xml_str("<Note>Smith &amp; Sons &lt;GmbH&gt;</Note>").unwrap();
        assert_eq!(root.text(), "Smith & Sons <GmbH>");
    }

    #[test]
    fn keeps_leaf_whitespace() {
        let root = from_xml_str("<Line>  indented </Line>").unwrap();
        assert_eq!(root.text(), "  indented ");
    }

    #[test]
    fn empty_tag_has_empty_text() {
        let root = from_xml_str("<Customers/>").unwrap();
        assert!(root.is_empty());
    }

    #[test]
    fn rejects_malformed() {
        let result = from_xml_str("<Articles><Article></Articles>");
        assert!(matches!(result, Err(CodecError::DecodingFailed { .. })));
    }

    #[test]
    fn rejects_non_utf8() {
        let result = from_xml(&[0x3c, 0xff, 0x3e]);
        assert_eq!(result, Err(CodecError::InvalidUtf8));
    }
}
