use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use crate::domain::value::{Recipient, StatusToken};

/// Delivery status per recipient, as returned by `GetAllMessageStatuses`.
pub type MessageStatuses = BTreeMap<Recipient, StatusToken>;

/// SOAP fault reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFault {
    pub code: String,
    pub message: String,
    pub detail: Option<String>,
    pub actor: Option<String>,
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl StdError for RemoteFault {}

#[derive(Debug, thiserror::Error)]
/// Failure of a remote call, carried inside [`ResponseEnvelope`].
pub enum ServiceError {
    /// The service answered with a SOAP fault.
    #[error("remote fault: {0}")]
    Fault(RemoteFault),

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code without a SOAP fault body.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body could not be decoded as the expected SOAP shape.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// A status line lacked the `recipient:status` shape.
    #[error("malformed status line: {line:?}")]
    MalformedStatusLine { line: String },
}

impl ServiceError {
    /// The SOAP fault, if the service reported one.
    pub fn fault(&self) -> Option<&RemoteFault> {
        match self {
            Self::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

/// Outcome of a single remote operation.
///
/// Holds either the decoded payload or the captured failure, never both.
#[derive(Debug)]
pub struct ResponseEnvelope<T> {
    outcome: Result<T, ServiceError>,
}

impl<T> ResponseEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self { outcome: Ok(data) }
    }

    pub fn err(error: ServiceError) -> Self {
        Self {
            outcome: Err(error),
        }
    }

    /// Decoded payload; `None` when the call failed.
    pub fn data(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    /// Captured failure; `None` when the call succeeded.
    pub fn error(&self) -> Option<&ServiceError> {
        self.outcome.as_ref().err()
    }

    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn failed(&self) -> bool {
        self.outcome.is_err()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseEnvelope<U> {
        ResponseEnvelope {
            outcome: self.outcome.map(f),
        }
    }

    /// Convert into a `Result` for `?`-style callers.
    pub fn into_result(self) -> Result<T, ServiceError> {
        self.outcome
    }
}

impl<T> From<Result<T, ServiceError>> for ResponseEnvelope<T> {
    fn from(outcome: Result<T, ServiceError>) -> Self {
        Self { outcome }
    }
}

/// Parse `recipient:STATUS` lines, splitting on the first colon.
///
/// Any line without a colon or with an empty recipient rejects the whole response.
pub fn parse_status_lines<I, S>(lines: I) -> Result<MessageStatuses, ServiceError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| {
            let line = line.as_ref();
            let malformed = || ServiceError::MalformedStatusLine {
                line: line.to_owned(),
            };
            let (recipient, status) = line.split_once(':').ok_or_else(malformed)?;
            let recipient = Recipient::new(recipient).map_err(|_| malformed())?;
            Ok((recipient, StatusToken::new(status)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::KnownStatus;

    fn fault() -> RemoteFault {
        RemoteFault {
            code: "SOAP-ENV:Client".to_owned(),
            message: "Invalid signature".to_owned(),
            detail: None,
            actor: None,
        }
    }

    #[test]
    fn envelope_success_holds_only_data() {
        let envelope = ResponseEnvelope::ok("2410290".to_owned());
        assert!(envelope.success());
        assert!(!envelope.failed());
        assert_eq!(envelope.data().map(String::as_str), Some("2410290"));
        assert!(envelope.error().is_none());
    }

    #[test]
    fn envelope_failure_holds_only_error() {
        let envelope: ResponseEnvelope<String> =
            ResponseEnvelope::err(ServiceError::Fault(fault()));
        assert!(!envelope.success());
        assert!(envelope.failed());
        assert!(envelope.data().is_none());
        assert_eq!(envelope.error().and_then(ServiceError::fault), Some(&fault()));
        assert!(envelope.into_result().is_err());
    }

    #[test]
    fn envelope_map_keeps_state() {
        let envelope = ResponseEnvelope::ok(2410290_u64).map(|id| id.to_string());
        assert_eq!(envelope.data().map(String::as_str), Some("2410290"));

        let envelope: ResponseEnvelope<u64> = ResponseEnvelope::err(ServiceError::HttpStatus {
            status: 502,
            body: None,
        });
        let mapped = envelope.map(|id| id.to_string());
        assert!(mapped.failed());
    }

    #[test]
    fn fault_display_includes_detail() {
        let mut fault = fault();
        assert_eq!(fault.to_string(), "SOAP-ENV:Client: Invalid signature");
        fault.detail = Some("signature mismatch".to_owned());
        assert_eq!(
            fault.to_string(),
            "SOAP-ENV:Client: Invalid signature (signature mismatch)"
        );
    }

    #[test]
    fn parse_status_lines_builds_mapping() {
        let statuses =
            parse_status_lines(["421900123456:MESSAGE-EXPIRED", "421900654321:DELIVERED"])
                .unwrap();

        let expired = Recipient::new("421900123456").unwrap();
        let delivered = Recipient::new("421900654321").unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(
            statuses.get(&expired).and_then(StatusToken::known),
            Some(KnownStatus::MessageExpired)
        );
        assert_eq!(statuses.get(&delivered).unwrap().as_str(), "DELIVERED");
    }

    #[test]
    fn parse_status_lines_splits_on_first_colon() {
        let statuses = parse_status_lines(["900123456:ODD:TOKEN"]).unwrap();
        let key = Recipient::new("900123456").unwrap();
        assert_eq!(statuses.get(&key).unwrap().as_str(), "ODD:TOKEN");
    }

    #[test]
    fn parse_status_lines_accepts_empty_response() {
        let statuses = parse_status_lines(Vec::<String>::new()).unwrap();
        assert!(statuses.is_empty());
    }

    #[test]
    fn parse_status_lines_rejects_malformed_lines() {
        let err = parse_status_lines(["421900123456:DELIVERED", "garbage"]).unwrap_err();
        match err {
            ServiceError::MalformedStatusLine { line } => assert_eq!(line, "garbage"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse_status_lines([":DELIVERED"]).unwrap_err();
        assert!(matches!(err, ServiceError::MalformedStatusLine { .. }));
    }
}
