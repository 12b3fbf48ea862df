//! Client layer: validates local input, signs requests, and wraps remote outcomes.

mod service;

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::{
    AmbiguousRecipient, Credit, IntegrationCode, IntegrationId, MessageStatuses, MessageText,
    Recipient, RecipientInput, RecipientSet, RequestId, ResponseEnvelope, SendTime, Sender,
    ServiceError, SignedRequestBuilder, StatusToken, ValidationError, parse_status_lines,
};

pub use service::{BoxFuture, SmsFarmService};
use service::{HttpTransport, ReqwestTransport, SoapService};

const DEFAULT_ENDPOINT: &str = "http://app.smsfarm.sk/api/";
const DEFAULT_WSDL_URL: &str = "http://app.smsfarm.sk/api/?wsdl";
const DEFAULT_NAMESPACE: &str = "http://app.smsfarm.sk/api/";

#[derive(Debug, thiserror::Error)]
/// Errors raised by [`SmsFarmClient`] before any remote call is made, or while connecting.
///
/// Failures of the remote calls themselves are never raised; they are carried in
/// [`ResponseEnvelope::error`].
pub enum SmsFarmError {
    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A status query needs exactly one recipient.
    #[error("ambiguous recipient: {0}")]
    AmbiguousRecipient(#[from] AmbiguousRecipient),

    /// A configured URL could not be parsed.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned while fetching the service description.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The service description could not be parsed.
    #[error("invalid service description: {0}")]
    ServiceDescription(#[source] Box<dyn StdError + Send + Sync>),

    /// The service description does not declare an operation this client calls.
    #[error("service description does not declare operation {0}")]
    MissingOperation(&'static str),
}

#[derive(Clone)]
/// Builder for [`SmsFarmClient`].
///
/// Use this when you need a fixed sender, a different endpoint, a timeout, or a custom
/// [`SmsFarmService`] implementation.
pub struct SmsFarmClientBuilder {
    integration_code: String,
    integration_id: String,
    sender: Option<String>,
    endpoint: Option<String>,
    wsdl_url: Option<String>,
    namespace: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    service: Option<Arc<dyn SmsFarmService>>,
}

impl SmsFarmClientBuilder {
    /// Create a builder with the default endpoint and the host name as sender.
    pub fn new(integration_code: impl Into<String>, integration_id: impl Into<String>) -> Self {
        Self {
            integration_code: integration_code.into(),
            integration_id: integration_id.into(),
            sender: None,
            endpoint: None,
            wsdl_url: None,
            namespace: None,
            timeout: None,
            user_agent: None,
            service: None,
        }
    }

    /// Sender name or number; defaults to the local host name.
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Override the SOAP endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Override the service description URL used by [`SmsFarmClientBuilder::connect`].
    ///
    /// Defaults to the endpoint with a `wsdl` query.
    pub fn wsdl_url(mut self, url: impl Into<String>) -> Self {
        self.wsdl_url = Some(url.into());
        self
    }

    /// Override the namespace of the operation elements.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom [`SmsFarmService`] instead of the SOAP binding.
    ///
    /// HTTP settings (endpoint, namespace, timeout, user agent) are ignored in that case.
    pub fn service(mut self, service: Arc<dyn SmsFarmService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Build a [`SmsFarmClient`] without contacting the service.
    pub fn build(mut self) -> Result<SmsFarmClient, SmsFarmError> {
        let service = match self.service.take() {
            Some(service) => service,
            None => {
                let endpoint = self
                    .endpoint
                    .take()
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
                let namespace = self
                    .namespace
                    .take()
                    .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned());
                let http = self.http_transport()?;
                soap_service(endpoint, namespace, http)?
            }
        };
        self.into_client(service)
    }

    /// Fetch the service description, check it declares every operation this client calls,
    /// and build a client bound to its namespace and address.
    ///
    /// Network and parse failures are returned as errors.
    pub async fn connect(self) -> Result<SmsFarmClient, SmsFarmError> {
        let http = self.http_transport()?;
        self.connect_with(http).await
    }

    async fn connect_with(
        mut self,
        http: Arc<dyn HttpTransport>,
    ) -> Result<SmsFarmClient, SmsFarmError> {
        let wsdl_url = match (self.wsdl_url.take(), self.endpoint.as_deref()) {
            (Some(url), _) => url,
            (None, Some(endpoint)) => wsdl_url_for(endpoint)?,
            (None, None) => DEFAULT_WSDL_URL.to_owned(),
        };
        parse_url(&wsdl_url)?;
        debug!(url = %wsdl_url, "fetching smsfarm service description");

        let response = http.get(&wsdl_url).await.map_err(SmsFarmError::Transport)?;
        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(SmsFarmError::HttpStatus {
                status: response.status,
                body,
            });
        }

        let description = crate::transport::parse_service_description(&response.body)
            .map_err(|err| SmsFarmError::ServiceDescription(Box::new(err)))?;
        if let Some(missing) = description.missing_operations().first() {
            return Err(SmsFarmError::MissingOperation(missing.as_str()));
        }

        let endpoint = self
            .endpoint
            .take()
            .or(description.location)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
        let namespace = self
            .namespace
            .take()
            .or(description.target_namespace)
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned());
        debug!(%endpoint, %namespace, "smsfarm service description loaded");

        let service = soap_service(endpoint, namespace, http)?;
        self.into_client(service)
    }

    fn http_transport(&self) -> Result<Arc<dyn HttpTransport>, SmsFarmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder
            .build()
            .map_err(|err| SmsFarmError::Transport(Box::new(err)))?;
        Ok(Arc::new(ReqwestTransport { client }))
    }

    fn into_client(self, service: Arc<dyn SmsFarmService>) -> Result<SmsFarmClient, SmsFarmError> {
        let sender = match self.sender {
            Some(sender) => Sender::new(sender)?,
            None => Sender::from_hostname()?,
        };

        Ok(SmsFarmClient {
            integration_code: IntegrationCode::new(self.integration_code)?,
            integration_id: IntegrationId::new(self.integration_id)?,
            sender,
            recipients: RecipientSet::new(),
            service,
        })
    }
}

fn soap_service(
    endpoint: String,
    namespace: String,
    http: Arc<dyn HttpTransport>,
) -> Result<Arc<dyn SmsFarmService>, SmsFarmError> {
    parse_url(&endpoint)?;
    Ok(Arc::new(SoapService::new(endpoint, namespace, http)))
}

fn parse_url(raw: &str) -> Result<url::Url, SmsFarmError> {
    url::Url::parse(raw).map_err(|source| SmsFarmError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })
}

fn wsdl_url_for(endpoint: &str) -> Result<String, SmsFarmError> {
    let mut url = parse_url(endpoint)?;
    url.set_query(Some("wsdl"));
    Ok(url.into())
}

#[derive(Clone)]
/// High-level smsfarm.sk client.
///
/// Holds the credentials, the sender, and the accumulated recipients. Every operation validates
/// its input locally, signs the request, performs exactly one remote call, and returns the
/// outcome as a [`ResponseEnvelope`]. Only local precondition failures are returned as
/// [`SmsFarmError`].
pub struct SmsFarmClient {
    integration_code: IntegrationCode,
    integration_id: IntegrationId,
    sender: Sender,
    recipients: RecipientSet,
    service: Arc<dyn SmsFarmService>,
}

impl SmsFarmClient {
    /// Create a client using the default endpoint and the host name as sender.
    ///
    /// For more customization, use [`SmsFarmClient::builder`].
    pub fn new(
        integration_code: impl Into<String>,
        integration_id: impl Into<String>,
    ) -> Result<Self, SmsFarmError> {
        SmsFarmClientBuilder::new(integration_code, integration_id).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(
        integration_code: impl Into<String>,
        integration_id: impl Into<String>,
    ) -> SmsFarmClientBuilder {
        SmsFarmClientBuilder::new(integration_code, integration_id)
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn integration_id(&self) -> &IntegrationId {
        &self.integration_id
    }

    pub fn recipients(&self) -> &RecipientSet {
        &self.recipients
    }

    /// Append one or many recipients for subsequent sends.
    pub fn add_recipients(&mut self, input: impl Into<RecipientInput>) -> &mut Self {
        self.recipients.add(input);
        self
    }

    /// Append recipients from a JSON string or array of strings.
    pub fn add_recipients_value(
        &mut self,
        value: serde_json::Value,
    ) -> Result<&mut Self, SmsFarmError> {
        self.recipients.add_value(value)?;
        Ok(self)
    }

    fn requests(&self) -> SignedRequestBuilder<'_> {
        SignedRequestBuilder::new(&self.integration_code, &self.integration_id, &self.sender)
    }

    /// Send `message` to every configured recipient.
    ///
    /// On success the envelope holds the request id assigned by the service.
    ///
    /// Errors:
    /// - [`SmsFarmError::Validation`] for an empty message or when no recipients are configured.
    pub async fn send_message(
        &self,
        message: impl Into<String>,
    ) -> Result<ResponseEnvelope<RequestId>, SmsFarmError> {
        let message = MessageText::new(message)?;
        let request = self.requests().send_message(&self.recipients, &message)?;

        let outcome = self.service.send_message(&request).await;
        Ok(outcome.and_then(decode_request_id).into())
    }

    /// Send `message` to every configured recipient at `send_time` (`YYYY-MM-DD HH:MM`).
    ///
    /// Errors:
    /// - [`SmsFarmError::Validation`] for a malformed time, an empty message, or when no
    ///   recipients are configured.
    pub async fn send_scheduled_message(
        &self,
        message: impl Into<String>,
        send_time: &str,
    ) -> Result<ResponseEnvelope<RequestId>, SmsFarmError> {
        let send_time = SendTime::parse(send_time)?;
        self.send_scheduled_message_at(message, send_time).await
    }

    /// Like [`SmsFarmClient::send_scheduled_message`] with an already validated time.
    pub async fn send_scheduled_message_at(
        &self,
        message: impl Into<String>,
        send_time: SendTime,
    ) -> Result<ResponseEnvelope<RequestId>, SmsFarmError> {
        let message = MessageText::new(message)?;
        let request = self
            .requests()
            .send_scheduled_message(&self.recipients, &message, send_time)?;

        let outcome = self.service.send_scheduled_message(&request).await;
        Ok(outcome.and_then(decode_request_id).into())
    }

    /// Delivery status of `request_id` for one recipient.
    ///
    /// When `recipient` is `None`, the single configured recipient is used.
    ///
    /// Errors:
    /// - [`SmsFarmError::AmbiguousRecipient`] when no recipient is given and zero or several
    ///   are configured.
    pub async fn get_message_status(
        &self,
        request_id: &RequestId,
        recipient: Option<&Recipient>,
    ) -> Result<ResponseEnvelope<StatusToken>, SmsFarmError> {
        let recipient = match recipient {
            Some(recipient) => recipient,
            None => self.recipients.resolve_single()?,
        };
        let request = self.requests().message_status(request_id, recipient)?;

        let outcome = self.service.get_message_status(&request).await;
        Ok(outcome.map(StatusToken::new).into())
    }

    /// Delivery status of `request_id` for every recipient it was sent to.
    ///
    /// A returned line without the `recipient:STATUS` shape fails the whole envelope with
    /// [`ServiceError::MalformedStatusLine`].
    pub async fn get_all_message_statuses(
        &self,
        request_id: &RequestId,
    ) -> Result<ResponseEnvelope<MessageStatuses>, SmsFarmError> {
        let request = self.requests().all_message_statuses(request_id)?;

        let outcome = self.service.get_all_message_statuses(&request).await;
        Ok(outcome.and_then(|lines| parse_status_lines(lines)).into())
    }

    /// Remaining account credit.
    pub async fn get_credit(&self) -> Result<ResponseEnvelope<Credit>, SmsFarmError> {
        let request = self.requests().credit()?;

        let outcome = self.service.get_credit_amount(&request).await;
        Ok(outcome.map(Credit::new).into())
    }
}

fn decode_request_id(raw: String) -> Result<RequestId, ServiceError> {
    RequestId::new(raw).map_err(|err| ServiceError::Parse(Box::new(err)))
}
