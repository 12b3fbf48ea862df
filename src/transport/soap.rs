use quick_xml::escape::escape;
use roxmltree::{Document, Node};

use super::TransportError;
use crate::domain::{Arguments, Operation, RemoteFault};

pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Encoded SOAP 1.1 request ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapCall {
    pub operation: Operation,
    pub soap_action: String,
    pub body: String,
}

/// Return value of a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapValue {
    Scalar(String),
    List(Vec<String>),
}

impl SoapValue {
    pub fn into_scalar(self) -> Result<String, TransportError> {
        match self {
            Self::Scalar(value) => Ok(value),
            Self::List(_) => Err(TransportError::UnexpectedShape {
                expected: "scalar",
                found: "array",
            }),
        }
    }

    /// An empty scalar is an empty array (servers often collapse `item[0]` to an empty element).
    pub fn into_list(self) -> Result<Vec<String>, TransportError> {
        match self {
            Self::List(items) => Ok(items),
            Self::Scalar(value) if value.is_empty() => Ok(Vec::new()),
            Self::Scalar(_) => Err(TransportError::UnexpectedShape {
                expected: "array",
                found: "scalar",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedResponse {
    Value(SoapValue),
    Fault(RemoteFault),
}

pub fn encode_call(namespace: &str, operation: Operation, arguments: &Arguments<'_>) -> SoapCall {
    let name = operation.as_str();

    let mut body = String::with_capacity(256);
    body.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    body.push_str(&format!(
        r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="{SOAP_ENV_NS}" xmlns:ns1="{}">"#,
        escape(namespace)
    ));
    body.push_str("<SOAP-ENV:Body>");
    body.push_str(&format!("<ns1:{name}>"));
    for (field, value) in arguments {
        body.push_str(&format!("<{field}>{}</{field}>", escape(*value)));
    }
    body.push_str(&format!("</ns1:{name}>"));
    body.push_str("</SOAP-ENV:Body></SOAP-ENV:Envelope>");

    SoapCall {
        operation,
        soap_action: format!("\"{namespace}#{name}\""),
        body,
    }
}

pub fn decode_response(xml: &str) -> Result<DecodedResponse, TransportError> {
    let doc = Document::parse(xml)?;
    let envelope = doc.root_element();
    if envelope.tag_name().name() != "Envelope" {
        return Err(TransportError::MissingElement("Envelope"));
    }

    let body = child_element(envelope, "Body").ok_or(TransportError::MissingElement("Body"))?;
    let payload = body
        .children()
        .find(Node::is_element)
        .ok_or(TransportError::MissingElement("Body content"))?;

    if payload.tag_name().name() == "Fault" {
        return Ok(DecodedResponse::Fault(decode_fault(payload)));
    }

    let value = match payload.children().find(Node::is_element) {
        None => SoapValue::Scalar(String::new()),
        Some(ret) if ret.children().any(|it| it.is_element()) => SoapValue::List(
            ret.children()
                .filter(Node::is_element)
                .map(trimmed_text)
                .collect(),
        ),
        Some(ret) => SoapValue::Scalar(trimmed_text(ret)),
    };

    Ok(DecodedResponse::Value(value))
}

fn decode_fault(fault: Node<'_, '_>) -> RemoteFault {
    let field = |name: &str| child_element(fault, name).map(trimmed_text);
    let detail = child_element(fault, "detail")
        .map(|node| {
            node.descendants()
                .filter(Node::is_text)
                .filter_map(|it| it.text())
                .collect::<String>()
                .trim()
                .to_owned()
        })
        .filter(|it| !it.is_empty());

    RemoteFault {
        code: field("faultcode").unwrap_or_default(),
        message: field("faultstring").unwrap_or_default(),
        detail,
        actor: field("faultactor").filter(|it| !it.is_empty()),
    }
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
}

fn trimmed_text(node: Node<'_, '_>) -> String {
    node.text().map(str::trim).unwrap_or_default().to_owned()
}
