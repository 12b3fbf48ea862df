use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// smsfarm.sk integration code, the shared secret used to sign requests.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct IntegrationCode(String);

impl IntegrationCode {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "integration_code";

    /// Create a validated [`IntegrationCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IntegrationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IntegrationCode(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// smsfarm.sk integration id (account identifier).
///
/// Invariant: non-empty after trimming. The value is kept as given since it is signed.
pub struct IntegrationId(String);

impl IntegrationId {
    /// Wire argument name (`integration_id`).
    pub const FIELD: &'static str = "integration_id";

    /// Create a validated [`IntegrationId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Originating name or number shown to recipients.
///
/// Invariant: non-empty after trimming.
pub struct Sender(String);

impl Sender {
    /// Wire argument name (`sender`).
    pub const FIELD: &'static str = "sender";

    /// Create a validated [`Sender`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Use the local host name as sender.
    pub fn from_hostname() -> Result<Self, ValidationError> {
        Self::new(gethostname::gethostname().to_string_lossy().into_owned())
    }

    /// Borrow the validated sender.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text.
///
/// Invariant: non-empty after trimming, and free of control characters XML 1.0 cannot carry.
/// Whitespace is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Wire argument name (`message`).
    pub const FIELD: &'static str = "message";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if let Some(found) = value.chars().find(|c| !is_xml_char(*c)) {
            return Err(ValidationError::InvalidCharacter {
                field: Self::FIELD,
                found,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..)
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Destination identifier (phone number) as sent to smsfarm.sk.
///
/// Invariant: non-empty after trimming. The number syntax itself is not checked.
pub struct Recipient(String);

impl Recipient {
    /// Wire argument name (`recipient`).
    pub const FIELD: &'static str = "recipient";

    /// Create a validated (non-empty) recipient.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Request id assigned by smsfarm.sk to an accepted send.
///
/// Invariant: non-empty after trimming.
pub struct RequestId(String);

impl RequestId {
    /// Wire argument name (`request_id`).
    pub const FIELD: &'static str = "request_id";

    /// Create a validated [`RequestId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Time at which a scheduled message is sent (`YYYY-MM-DD HH:MM`, 24-hour, zero-padded).
pub struct SendTime(NaiveDateTime);

impl SendTime {
    /// Wire argument name (`send_time`).
    pub const FIELD: &'static str = "send_time";

    const FORMAT: &'static str = "%Y-%m-%d %H:%M";
    const WIRE_LEN: usize = "YYYY-MM-DD HH:MM".len();

    /// Parse a send time in the fixed `YYYY-MM-DD HH:MM` pattern.
    ///
    /// Fields must be zero-padded and form a real calendar date and time.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidSendTime {
            input: input.to_owned(),
        };
        let well_formed = input.len() == Self::WIRE_LEN
            && input.bytes().enumerate().all(|(idx, byte)| match idx {
                4 | 7 => byte == b'-',
                10 => byte == b' ',
                13 => byte == b':',
                _ => byte.is_ascii_digit(),
            });
        if !well_formed {
            return Err(invalid());
        }
        NaiveDateTime::parse_from_str(input, Self::FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Build a send time from a date-time; seconds are truncated.
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        Self(
            value
                .with_second(0)
                .and_then(|it| it.with_nanosecond(0))
                .unwrap_or(value),
        )
    }

    /// The underlying date-time.
    pub fn datetime(self) -> NaiveDateTime {
        self.0
    }

    /// Render in the wire pattern.
    pub fn to_wire(self) -> String {
        self.0.format(Self::FORMAT).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Remaining account credit as returned by smsfarm.sk.
///
/// The decimal token is preserved as-is (`9.20` stays `"9.20"`).
pub struct Credit(String);

impl Credit {
    /// Wrap a credit token returned by the service.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    /// Borrow the decimal token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the token as a floating point amount.
    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Delivery status token as reported by smsfarm.sk.
///
/// The token is preserved as-is even when unknown to this crate.
pub struct StatusToken(String);

impl StatusToken {
    /// Wrap a status token returned by the service.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    /// Borrow the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this token to a known status, if one exists.
    pub fn known(&self) -> Option<KnownStatus> {
        KnownStatus::from_token(&self.0)
    }

    /// Returns `true` if the message will not change status anymore.
    pub fn is_final(&self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_final())
    }

    /// Returns `true` if the message reached the handset.
    pub fn is_delivered(&self) -> bool {
        self.known() == Some(KnownStatus::Delivered)
    }
}

impl From<KnownStatus> for StatusToken {
    fn from(value: KnownStatus) -> Self {
        Self(value.as_str().to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
#[non_exhaustive]
/// Known delivery status tokens.
pub enum KnownStatus {
    /// Message is queued and will be sent shortly.
    Queued,
    /// Message is being sent right now.
    Sending,
    /// Message was sent successfully.
    Sent,
    /// Message was delivered to the handset.
    Delivered,
    /// No valid number was supplied in the request.
    InvalidNumber,
    /// Message was cancelled by the user.
    MessageCancelled,
    /// Delivery time expired.
    MessageExpired,
    /// Message not delivered for an unknown reason.
    MessageUndelivered,
    /// Message was sent, but the delivery status is unknown.
    SentDeliveryUnknown,
    /// Destination country is forbidden.
    CountryForbidden,
    /// Unknown error while sending.
    SendingFailed,
}

impl KnownStatus {
    /// Convert a raw token into a known variant.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "QUEUED" => Self::Queued,
            "SENDING" => Self::Sending,
            "SENT" => Self::Sent,
            "DELIVERED" => Self::Delivered,
            "INVALID-NUMBER" => Self::InvalidNumber,
            "MESSAGE-CANCELLED" => Self::MessageCancelled,
            "MESSAGE-EXPIRED" => Self::MessageExpired,
            "MESSAGE-UNDELIVERED" => Self::MessageUndelivered,
            "SENT-DELIVERY-UNKNOWN" => Self::SentDeliveryUnknown,
            "COUNTRY-FORBIDDEN" => Self::CountryForbidden,
            "SENDING-FAILED" => Self::SendingFailed,
            _ => return None,
        })
    }

    /// Token as sent by the service.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Sending => "SENDING",
            Self::Sent => "SENT",
            Self::Delivered => "DELIVERED",
            Self::InvalidNumber => "INVALID-NUMBER",
            Self::MessageCancelled => "MESSAGE-CANCELLED",
            Self::MessageExpired => "MESSAGE-EXPIRED",
            Self::MessageUndelivered => "MESSAGE-UNDELIVERED",
            Self::SentDeliveryUnknown => "SENT-DELIVERY-UNKNOWN",
            Self::CountryForbidden => "COUNTRY-FORBIDDEN",
            Self::SendingFailed => "SENDING-FAILED",
        }
    }

    /// Whether the status is terminal (no further transitions expected).
    pub fn is_final(self) -> bool {
        !matches!(self, Self::Queued | Self::Sending | Self::Sent)
    }
}
