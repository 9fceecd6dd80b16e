//! # officedb Codec
//!
//! The structured tree representation of officedb records and its XML
//! text encoding.
//!
//! Every persisted record is converted to an [`Element`] (a name, ordered
//! attributes, text, and ordered children) and every collection file is one
//! element tree written as XML.
//!
//! ## Encoding Rules
//!
//! - UTF-8 with an XML declaration
//! - Two-space indentation between elements
//! - Leaf text is written inline and read back verbatim
//! - Whitespace-only text between child elements is not significant
//! - Elements without text or children are written as empty tags
//! - CR in text and tab, LF and CR in attribute values are written as
//!   character references so they read back unchanged
//! - Names must be colon-free XML names and text must consist of XML 1.0
//!   characters; anything else fails to encode instead of producing a file
//!   that cannot be read
//!
//! ## Usage
//!
//! ```
//! use officedb_codec::{from_xml, to_xml, Element};
//!
//! let unit = Element::new("Unit")
//!     .with_text_child("Name", "Piece")
//!     .with_text_child("ShortName", "pcs");
//!
//! let bytes = to_xml(&unit).unwrap();
//! let decoded = from_xml(&bytes).unwrap();
//! assert_eq!(unit, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod chars;
mod decoder;
mod element;
mod encoder;
mod error;

pub use chars::{is_xml_char, is_xml_name};
pub use decoder::{from_xml, from_xml_str};
pub use element::Element;
pub use encoder::{to_xml, XmlEncoder};
pub use error::{CodecError, CodecResult};
