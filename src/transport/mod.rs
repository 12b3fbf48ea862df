//! Transport layer: SOAP wire-format details (serialization/deserialization).

mod soap;
mod wsdl;

pub use soap::{
    CONTENT_TYPE, DecodedResponse, SoapCall, SoapValue, decode_response, encode_call,
};
pub use wsdl::{ServiceDescription, parse_service_description};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("missing SOAP element: {0}")]
    MissingElement(&'static str),

    #[error("expected {expected} result, got {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },
}
