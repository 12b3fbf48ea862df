use std::fmt;

use serde_json::Value;

use crate::domain::validation::ValidationError;
use crate::domain::value::Recipient;

/// One or many recipients to append to a [`RecipientSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientInput {
    One(Recipient),
    Many(Vec<Recipient>),
}

impl From<Recipient> for RecipientInput {
    fn from(value: Recipient) -> Self {
        Self::One(value)
    }
}

impl From<Vec<Recipient>> for RecipientInput {
    fn from(value: Vec<Recipient>) -> Self {
        Self::Many(value)
    }
}

impl TryFrom<Value> for RecipientInput {
    type Error = ValidationError;

    /// Accepts a JSON string or an array of JSON strings; anything else is rejected.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(raw) => Ok(Self::One(Recipient::new(raw)?)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(raw) => Recipient::new(raw),
                    other => Err(ValidationError::InvalidRecipientType {
                        found: json_kind(&other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Many),
            other => Err(ValidationError::InvalidRecipientType {
                found: json_kind(&other),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single recipient was required but `count` are configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbiguousRecipient {
    pub count: usize,
}

impl fmt::Display for AmbiguousRecipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exactly one recipient required, {} configured; specify the recipient explicitly",
            self.count
        )
    }
}

impl std::error::Error for AmbiguousRecipient {}

/// Ordered, append-only collection of destination identifiers.
///
/// Entries are never deduplicated or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSet {
    recipients: Vec<Recipient>,
}

impl RecipientSet {
    /// Wire argument name (`recipients`).
    pub const FIELD: &'static str = "recipients";

    pub fn new() -> Self {
        Self::default()
    }

    /// Append one or many recipients, preserving order.
    pub fn add(&mut self, input: impl Into<RecipientInput>) {
        match input.into() {
            RecipientInput::One(recipient) => self.recipients.push(recipient),
            RecipientInput::Many(recipients) => self.recipients.extend(recipients),
        }
    }

    /// Append recipients from a loosely typed JSON value (string or array of strings).
    ///
    /// On error nothing is appended.
    pub fn add_value(&mut self, value: Value) -> Result<(), ValidationError> {
        let input = RecipientInput::try_from(value)?;
        self.add(input);
        Ok(())
    }

    /// Comma-joined wire form; empty when no recipients were added.
    pub fn render(&self) -> String {
        self.recipients
            .iter()
            .map(Recipient::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The sole recipient; zero or several recipients are ambiguous.
    pub fn resolve_single(&self) -> Result<&Recipient, AmbiguousRecipient> {
        match self.recipients.as_slice() {
            [only] => Ok(only),
            other => Err(AmbiguousRecipient { count: other.len() }),
        }
    }

    pub fn as_slice(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}
