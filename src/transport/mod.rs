//! Transport layer: XML wire-format details (serialization/deserialization).

mod request_xml;
mod response_xml;

pub use request_xml::{encode_request_xml, parse_xml_template};
pub use response_xml::decode_response_xml;

#[derive(Debug, thiserror::Error)]
/// Errors raised while reading or writing gateway XML documents.
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid root template: {reason}")]
    InvalidTemplate { reason: &'static str },

    #[error("invalid XML document: {reason}")]
    InvalidDocument { reason: &'static str },

    #[error("field {field} contains a character that XML 1.0 does not allow")]
    InvalidCharacter { field: String },

    #[error("response field {field} appears more than once")]
    DuplicateField { field: String },

    #[error("response field {field} contains nested elements")]
    NestedElement { field: String },

    #[error("failed to write XML: {0}")]
    Write(String),

    #[error("XML output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
