use std::collections::BTreeSet;

use roxmltree::Document;

use super::TransportError;
use crate::domain::Operation;

/// The parts of a WSDL document the client relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescription {
    pub target_namespace: Option<String>,
    pub location: Option<String>,
    pub operations: BTreeSet<String>,
}

impl ServiceDescription {
    /// Operations the client calls that the description does not declare.
    pub fn missing_operations(&self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| !self.operations.contains(op.as_str()))
            .collect()
    }
}

pub fn parse_service_description(xml: &str) -> Result<ServiceDescription, TransportError> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "definitions" {
        return Err(TransportError::MissingElement("definitions"));
    }

    let operations = root
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "operation")
        .filter(|node| {
            node.parent_element()
                .is_some_and(|parent| parent.tag_name().name() == "portType")
        })
        .filter_map(|node| node.attribute("name"))
        .map(str::to_owned)
        .collect();

    let location = root
        .descendants()
        .find(|node| node.is_element() && node.tag_name().name() == "address")
        .and_then(|node| node.attribute("location"))
        .map(str::to_owned);

    Ok(ServiceDescription {
        target_namespace: root.attribute("targetNamespace").map(str::to_owned),
        location,
        operations,
    })
}
