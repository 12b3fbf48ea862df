use crate::domain::recipients::RecipientSet;
use crate::domain::signature::Signature;
use crate::domain::validation::ValidationError;
use crate::domain::value::{
    IntegrationCode, IntegrationId, MessageText, Recipient, RequestId, SendTime, Sender,
};

/// Remote operations exposed by the smsfarm.sk service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetCreditAmount,
    SendMessage,
    SendScheduledMessage,
    GetMessageStatus,
    GetAllMessageStatuses,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Self::GetCreditAmount,
        Self::SendMessage,
        Self::SendScheduledMessage,
        Self::GetMessageStatus,
        Self::GetAllMessageStatuses,
    ];

    /// Operation name as declared by the service description.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetCreditAmount => "GetCreditAmount",
            Self::SendMessage => "SendMessage",
            Self::SendScheduledMessage => "SendScheduledMessage",
            Self::GetMessageStatus => "GetMessageStatus",
            Self::GetAllMessageStatuses => "GetAllMessageStatuses",
        }
    }
}

/// Positional argument list of a remote call: `(name, value)` in wire order.
pub type Arguments<'a> = Vec<(&'static str, &'a str)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCreditAmount {
    integration_id: IntegrationId,
    signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessage {
    sender: Sender,
    recipients: String,
    message: MessageText,
    integration_id: IntegrationId,
    signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendScheduledMessage {
    sender: Sender,
    recipient: String,
    message: MessageText,
    send_time: String,
    integration_id: IntegrationId,
    signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetMessageStatus {
    request_id: RequestId,
    recipient: Recipient,
    integration_id: IntegrationId,
    signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAllMessageStatuses {
    integration_id: IntegrationId,
    request_id: RequestId,
    signature: Signature,
}

impl GetCreditAmount {
    pub const OPERATION: Operation = Operation::GetCreditAmount;

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn arguments(&self) -> Arguments<'_> {
        vec![
            (IntegrationId::FIELD, self.integration_id.as_str()),
            (Signature::FIELD, self.signature.as_str()),
        ]
    }
}

impl SendMessage {
    pub const OPERATION: Operation = Operation::SendMessage;

    /// Comma-joined recipients as sent on the wire.
    pub fn recipients(&self) -> &str {
        &self.recipients
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn arguments(&self) -> Arguments<'_> {
        vec![
            (Sender::FIELD, self.sender.as_str()),
            (RecipientSet::FIELD, self.recipients.as_str()),
            (MessageText::FIELD, self.message.as_str()),
            (IntegrationId::FIELD, self.integration_id.as_str()),
            (Signature::FIELD, self.signature.as_str()),
        ]
    }
}

impl SendScheduledMessage {
    pub const OPERATION: Operation = Operation::SendScheduledMessage;

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn send_time(&self) -> &str {
        &self.send_time
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn arguments(&self) -> Arguments<'_> {
        vec![
            (Sender::FIELD, self.sender.as_str()),
            (Recipient::FIELD, self.recipient.as_str()),
            (MessageText::FIELD, self.message.as_str()),
            (SendTime::FIELD, self.send_time.as_str()),
            (IntegrationId::FIELD, self.integration_id.as_str()),
            (Signature::FIELD, self.signature.as_str()),
        ]
    }
}

impl GetMessageStatus {
    pub const OPERATION: Operation = Operation::GetMessageStatus;

    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn arguments(&self) -> Arguments<'_> {
        vec![
            (RequestId::FIELD, self.request_id.as_str()),
            (Recipient::FIELD, self.recipient.as_str()),
            (IntegrationId::FIELD, self.integration_id.as_str()),
            (Signature::FIELD, self.signature.as_str()),
        ]
    }
}

impl GetAllMessageStatuses {
    pub const OPERATION: Operation = Operation::GetAllMessageStatuses;

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn arguments(&self) -> Arguments<'_> {
        vec![
            (IntegrationId::FIELD, self.integration_id.as_str()),
            (RequestId::FIELD, self.request_id.as_str()),
            (Signature::FIELD, self.signature.as_str()),
        ]
    }
}

/// Signs and assembles requests for one set of credentials.
#[derive(Debug, Clone, Copy)]
pub struct SignedRequestBuilder<'a> {
    code: &'a IntegrationCode,
    id: &'a IntegrationId,
    sender: &'a Sender,
}

impl<'a> SignedRequestBuilder<'a> {
    pub fn new(code: &'a IntegrationCode, id: &'a IntegrationId, sender: &'a Sender) -> Self {
        Self { code, id, sender }
    }

    /// `GetCreditAmount(integration_id, signature)`, signed over the integration id.
    pub fn credit(&self) -> Result<GetCreditAmount, ValidationError> {
        Ok(GetCreditAmount {
            integration_id: self.id.clone(),
            signature: self.sign(self.id.as_str())?,
        })
    }

    /// `SendMessage(sender, recipients, message, integration_id, signature)`, signed over the
    /// rendered recipients.
    pub fn send_message(
        &self,
        recipients: &RecipientSet,
        message: &MessageText,
    ) -> Result<SendMessage, ValidationError> {
        let rendered = render_non_empty(recipients)?;
        Ok(SendMessage {
            sender: self.sender.clone(),
            signature: self.sign(&rendered)?,
            recipients: rendered,
            message: message.clone(),
            integration_id: self.id.clone(),
        })
    }

    /// `SendScheduledMessage(sender, recipient, message, send_time, integration_id, signature)`,
    /// signed over the rendered recipients.
    pub fn send_scheduled_message(
        &self,
        recipients: &RecipientSet,
        message: &MessageText,
        send_time: SendTime,
    ) -> Result<SendScheduledMessage, ValidationError> {
        let rendered = render_non_empty(recipients)?;
        Ok(SendScheduledMessage {
            sender: self.sender.clone(),
            signature: self.sign(&rendered)?,
            recipient: rendered,
            message: message.clone(),
            send_time: send_time.to_wire(),
            integration_id: self.id.clone(),
        })
    }

    /// `GetMessageStatus(request_id, recipient, integration_id, signature)`, signed over the
    /// request id.
    pub fn message_status(
        &self,
        request_id: &RequestId,
        recipient: &Recipient,
    ) -> Result<GetMessageStatus, ValidationError> {
        Ok(GetMessageStatus {
            request_id: request_id.clone(),
            recipient: recipient.clone(),
            integration_id: self.id.clone(),
            signature: self.sign(request_id.as_str())?,
        })
    }

    /// `GetAllMessageStatuses(integration_id, request_id, signature)`, signed over the request id.
    pub fn all_message_statuses(
        &self,
        request_id: &RequestId,
    ) -> Result<GetAllMessageStatuses, ValidationError> {
        Ok(GetAllMessageStatuses {
            integration_id: self.id.clone(),
            request_id: request_id.clone(),
            signature: self.sign(request_id.as_str())?,
        })
    }

    fn sign(&self, context: &str) -> Result<Signature, ValidationError> {
        Signature::compute(self.code.as_str(), context)
    }
}

fn render_non_empty(recipients: &RecipientSet) -> Result<String, ValidationError> {
    if recipients.is_empty() {
        return Err(ValidationError::Empty {
            field: RecipientSet::FIELD,
        });
    }
    Ok(recipients.render())
}
