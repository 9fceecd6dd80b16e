//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to write an element tree as XML.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to parse XML text.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },

    /// Input bytes are not UTF-8.
    #[error("invalid UTF-8 input")]
    InvalidUtf8,

    /// A required child element is absent.
    #[error("element <{parent}> has no child <{name}>")]
    MissingElement {
        /// Name of the element that was searched.
        parent: String,
        /// Name of the missing child.
        name: String,
    },

    /// A field holds text that cannot be converted to its declared type.
    #[error("invalid value for {field}: {value:?}")]
    InvalidValue {
        /// The field being converted.
        field: String,
        /// The offending text.
        value: String,
    },

    /// An element has a different name than the record type expects.
    #[error("expected element <{expected}>, found <{found}>")]
    UnexpectedElement {
        /// The element name the decoder wanted.
        expected: String,
        /// The element name that was present.
        found: String,
    },
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }

    /// Create a missing element error.
    pub fn missing_element(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingElement {
            parent: parent.into(),
            name: name.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an unexpected element error.
    pub fn unexpected_element(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedElement {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
