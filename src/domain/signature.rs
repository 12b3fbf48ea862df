use std::fmt;

use crate::domain::validation::ValidationError;

/// Short request signature expected by smsfarm.sk.
///
/// Derived as `md5(secret ++ context)` rendered in lowercase hex, keeping the
/// 11 characters at offsets `10..21`. The slice is fixed by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// Wire argument name (`signature`).
    pub const FIELD: &'static str = "signature";

    /// Length of a signature in characters.
    pub const LEN: usize = 11;

    const OFFSET: usize = 10;

    /// Compute the signature over `secret` followed by `context`.
    pub fn compute(secret: &str, context: &str) -> Result<Self, ValidationError> {
        if secret.is_empty() {
            return Err(ValidationError::Empty {
                field: "signature secret",
            });
        }
        if context.is_empty() {
            return Err(ValidationError::Empty {
                field: "signature context",
            });
        }

        let mut raw = String::with_capacity(secret.len() + context.len());
        raw.push_str(secret);
        raw.push_str(context);

        let hex = format!("{:x}", md5::compute(raw.as_bytes()));
        Ok(Self(hex[Self::OFFSET..Self::OFFSET + Self::LEN].to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_the_fixed_md5_slice() {
        // md5("abc") = 900150983cd24fb0d6963f7d28e17f72
        let signature = Signature::compute("a", "bc").unwrap();
        assert_eq!(signature.as_str(), "d24fb0d6963");
        assert_eq!(signature.as_str().len(), Signature::LEN);
    }

    #[test]
    fn signature_concatenates_without_separator() {
        assert_eq!(
            Signature::compute("ab", "c").unwrap(),
            Signature::compute("a", "bc").unwrap()
        );
    }

    #[test]
    fn signature_is_deterministic_and_input_sensitive() {
        let first = Signature::compute("some-code", "900123456").unwrap();
        let second = Signature::compute("some-code", "900123456").unwrap();
        assert_eq!(first, second);

        assert_ne!(
            first,
            Signature::compute("other-code", "900123456").unwrap()
        );
        assert_ne!(first, Signature::compute("some-code", "900654321").unwrap());
        assert!(
            first
                .as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn signature_rejects_empty_inputs() {
        assert_eq!(
            Signature::compute("", "900123456"),
            Err(ValidationError::Empty {
                field: "signature secret"
            })
        );
        assert_eq!(
            Signature::compute("some-code", ""),
            Err(ValidationError::Empty {
                field: "signature context"
            })
        );
    }
}
