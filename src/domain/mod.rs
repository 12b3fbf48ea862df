//! Domain layer: strong types with validation and invariants (no I/O).

mod recipients;
mod request;
mod response;
mod signature;
mod validation;
mod value;

pub use recipients::{AmbiguousRecipient, RecipientInput, RecipientSet};
pub use request::{
    Arguments, GetAllMessageStatuses, GetCreditAmount, GetMessageStatus, Operation, SendMessage,
    SendScheduledMessage, SignedRequestBuilder,
};
pub use response::{MessageStatuses, RemoteFault, ResponseEnvelope, ServiceError, parse_status_lines};
pub use signature::Signature;
pub use validation::ValidationError;
pub use value::{
    Credit, IntegrationCode, IntegrationId, KnownStatus, MessageText, Recipient, RequestId,
    SendTime, Sender, StatusToken,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integration_id_rejects_empty() {
        assert!(matches!(
            IntegrationId::new("   "),
            Err(ValidationError::Empty {
                field: IntegrationId::FIELD
            })
        ));
    }

    #[test]
    fn integration_code_rejects_empty() {
        assert!(matches!(
            IntegrationCode::new(""),
            Err(ValidationError::Empty {
                field: IntegrationCode::FIELD
            })
        ));
    }

    #[test]
    fn signed_requests_share_the_signature_scheme() {
        let code = IntegrationCode::new("some-code").unwrap();
        let id = IntegrationId::new("some-id").unwrap();
        let sender = Sender::new("shop").unwrap();
        let builder = SignedRequestBuilder::new(&code, &id, &sender);

        let mut recipients = RecipientSet::new();
        recipients.add(Recipient::new("900123456").unwrap());
        let msg = MessageText::new("hello").unwrap();

        let send = builder.send_message(&recipients, &msg).unwrap();
        let scheduled = builder
            .send_scheduled_message(
                &recipients,
                &msg,
                SendTime::parse("2018-01-01 12:29").unwrap(),
            )
            .unwrap();
        assert_eq!(send.signature(), scheduled.signature());
        assert_eq!(
            send.signature(),
            &Signature::compute(code.as_str(), "900123456").unwrap()
        );
    }
}
