use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidSendTime { input: String },
    InvalidRecipientType { found: &'static str },
    InvalidCharacter { field: &'static str, found: char },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidSendTime { input } => {
                write!(f, "invalid send time: {input:?} (expected YYYY-MM-DD HH:MM)")
            }
            Self::InvalidRecipientType { found } => {
                write!(
                    f,
                    "invalid recipient type: {found} (expected string or list of strings)"
                )
            }
            Self::InvalidCharacter { field, found } => {
                write!(f, "{field} contains a character not allowed in XML: {found:?}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
