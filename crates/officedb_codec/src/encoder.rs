//! XML encoder.

use crate::chars::{escape_attr, escape_text, is_xml_char, is_xml_name};
use crate::element::Element;
use crate::error::{CodecError, CodecResult};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Encode an element tree as an indented UTF-8 XML document.
///
/// The output starts with an XML declaration and uses two-space
/// indentation. Elements with neither text nor children are written as
/// empty tags.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if a name is not a valid XML name,
/// if text or an attribute value holds a character XML 1.0 forbids, or if
/// the writer fails.
pub fn to_xml(element: &Element) -> CodecResult<Vec<u8>> {
    let mut encoder = XmlEncoder::new();
    encoder.write_declaration()?;
    encoder.encode(element)?;
    Ok(encoder.into_bytes())
}

/// Streaming writer from [`Element`] trees to XML.
pub struct XmlEncoder {
    writer: Writer<Vec<u8>>,
}

impl XmlEncoder {
    /// Create a new encoder with two-space indentation.
    pub fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    /// Write the `<?xml ...?>` declaration.
    pub fn write_declaration(&mut self) -> CodecResult<()> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
    }

    /// Encode one element and its subtree.
    ///
    /// Validation happens per element as it is written, so on error the
    /// buffer holds a partial document and must be discarded.
    pub fn encode(&mut self, element: &Element) -> CodecResult<()> {
        check_name(element.name())?;
        let mut start = BytesStart::new(element.name());
        for (key, value) in element.attributes() {
            if key == "xmlns" {
                return Err(CodecError::encoding_failed(format!(
                    "<{}> uses reserved attribute name xmlns",
                    element.name()
                )));
            }
            check_name(key)?;
            check_chars(element.name(), value)?;
            let escaped = escape_attr(value);
            start.push_attribute((key.as_bytes(), escaped.as_bytes()));
        }

        if element.is_empty() {
            return self.event(Event::Empty(start));
        }

        self.event(Event::Start(start))?;
        if element.children().is_empty() {
            check_chars(element.name(), element.text())?;
            self.event(Event::Text(BytesText::from_escaped(escape_text(
                element.text(),
            ))))?;
        } else {
            for child in element.children() {
                self.encode(child)?;
            }
        }
        self.event(Event::End(BytesEnd::new(element.name())))
    }

    /// Consume this encoder and return the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn event(&mut self, event: Event<'_>) -> CodecResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| CodecError::encoding_failed(e.to_string()))
    }
}

fn check_name(name: &str) -> CodecResult<()> {
    if is_xml_name(name) {
        Ok(())
    } else {
        Err(CodecError::encoding_failed(format!(
            "{name:?} is not a valid XML name"
        )))
    }
}

fn check_chars(element: &str, value: &str) -> CodecResult<()> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        None => Ok(()),
        Some(c) => Err(CodecError::encoding_failed(format!(
            "<{element}> holds character {c:?} which XML cannot represent"
        ))),
    }
}

impl Default for XmlEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_xml;

    fn encode_str(element: &Element) -> String {
        String::from_utf8(to_xml(element).unwrap()).unwrap()
    }

    #[test]
    fn writes_declaration_and_empty_root() {
        let xml = encode_str(&Element::new("Articles"));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.trim_end().ends_with("<Articles/>"));
    }

    #[test]
    fn text_stays_inline() {
        let xml = encode_str(&Element::new("Unit").with_text_child("Name", "Piece"));
        assert!(xml.contains("<Name>Piece</Name>"));
    }

    #[test]
    fn escapes_text_and_attributes() {
        let element = Element::text_node("Note", "a < b & c").with_attr("Key", "\"q\"");
        let xml = encode_str(&element);
        assert!(xml.contains("a &lt; b &amp; c"));
        assert!(!xml.contains("\"q\"\""));
    }

    #[test]
    fn rejects_control_characters() {
        let element =
            Element::new("Article").with_text_child("Description", "Widget\u{0C}pasted");
        assert!(matches!(to_xml(&element), Err(CodecError::EncodingFailed { .. })));

        let element = Element::new("Price").with_attr("Currency", "EU\u{1}R");
        assert!(matches!(to_xml(&element), Err(CodecError::EncodingFailed { .. })));
    }

    #[test]
    fn rejects_invalid_names() {
        for name in ["Net Total", "", "1st", "a:b"] {
            let element = Element::new("Invoice").with_text_child(name, "1");
            assert!(
                matches!(to_xml(&element), Err(CodecError::EncodingFailed { .. })),
                "{name:?} accepted"
            );
        }
        let element = Element::new("Entry").with_attr("bad key", "v");
        assert!(to_xml(&element).is_err());
        let element = Element::new("Entry").with_attr("xmlns", "urn:x");
        assert!(to_xml(&element).is_err());
    }

    #[test]
    fn carriage_returns_survive() {
        let element = Element::text_node("Description", "Line1\r\nLine2\r");
        let xml = encode_str(&element);
        assert!(xml.contains("Line1&#xD;\nLine2&#xD;"));
        assert_eq!(from_xml(xml.as_bytes()).unwrap(), element);
    }

    #[test]
    fn attribute_whitespace_survives() {
        let element = Element::new("Entry")
            .with_attr("Key", "tab\there\nnew\rline")
            .with_text("v");
        let xml = encode_str(&element);
        assert!(xml.contains("tab&#x9;here&#xA;new&#xD;line"));
        assert_eq!(from_xml(xml.as_bytes()).unwrap(), element);
    }

    #[test]
    fn children_are_indented() {
        let root = Element::new("Customers").with_child(Element::new("Customer"));
        let xml = encode_str(&root);
        assert!(xml.contains("\n  <Customer/>"));
    }
}
