//! XML 1.0 name and character rules.
//!
//! The encoder refuses anything the decoder could not read back, so a tree
//! that encodes successfully always decodes to an equal tree.

/// Returns true if `c` may appear in XML 1.0 text or attribute values.
#[must_use]
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Returns true if `name` is a valid element or attribute name.
///
/// Names follow the XML 1.0 `Name` production without colons, since
/// prefixed names would be read as namespaces.
#[must_use]
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start(c: char) -> bool {
    matches!(
        c,
        'A'..='Z'
            | '_'
            | 'a'..='z'
            | '\u{C0}'..='\u{D6}'
            | '\u{D8}'..='\u{F6}'
            | '\u{F8}'..='\u{2FF}'
            | '\u{370}'..='\u{37D}'
            | '\u{37F}'..='\u{1FFF}'
            | '\u{200C}'..='\u{200D}'
            | '\u{2070}'..='\u{218F}'
            | '\u{2C00}'..='\u{2FEF}'
            | '\u{3001}'..='\u{D7FF}'
            | '\u{F900}'..='\u{FDCF}'
            | '\u{FDF0}'..='\u{FFFD}'
            | '\u{10000}'..='\u{EFFFF}'
    )
}

fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || matches!(
            c,
            '-' | '.'
                | '0'..='9'
                | '\u{B7}'
                | '\u{300}'..='\u{36F}'
                | '\u{203F}'..='\u{2040}'
        )
}

/// Escapes leaf text.
///
/// A literal CR would be folded into LF by the reader.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
    out
}

/// Escapes an attribute value.
///
/// Tab, LF and CR become character references because attribute value
/// normalization turns the literal characters into spaces.
pub(crate) fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(is_xml_name("Invoice"));
        assert!(is_xml_name("_x"));
        assert!(is_xml_name("Straße-2.b"));
        assert!(!is_xml_name(""));
        assert!(!is_xml_name("Net Total"));
        assert!(!is_xml_name("1st"));
        assert!(!is_xml_name("-x"));
        assert!(!is_xml_name("ns:Tag"));
        assert!(!is_xml_name("a<b"));
    }

    #[test]
    fn chars() {
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('\r'));
        assert!(is_xml_char('ü'));
        assert!(is_xml_char('\u{1F600}'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{C}'));
        assert!(!is_xml_char('\u{1F}'));
        assert!(!is_xml_char('\u{FFFE}'));
    }

    #[test]
    fn whitespace_references() {
        assert_eq!(escape_text("a\r\nb\tc"), "a&#xD;\nb\tc");
        assert_eq!(escape_attr("a\tb\nc\rd"), "a&#x9;b&#xA;c&#xD;d");
        assert_eq!(escape_attr("\"x\" & 'y'"), "&quot;x&quot; &amp; &apos;y&apos;");
    }
}
