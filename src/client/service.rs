//! Remote service seam: the five smsfarm.sk operations and their SOAP binding.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    Arguments, GetAllMessageStatuses, GetCreditAmount, GetMessageStatus, Operation, SendMessage,
    SendScheduledMessage, ServiceError,
};
use crate::transport::{CONTENT_TYPE, DecodedResponse, SoapValue, TransportError};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The operations offered by smsfarm.sk.
///
/// The client binds these to SOAP over HTTP by default; any other implementation (a recording
/// fake, a different toolkit) can be plugged into [`crate::SmsFarmClientBuilder::service`].
pub trait SmsFarmService: Send + Sync {
    /// Returns the remaining credit as a decimal token.
    fn get_credit_amount<'a>(
        &'a self,
        request: &'a GetCreditAmount,
    ) -> BoxFuture<'a, Result<String, ServiceError>>;

    /// Returns the request id assigned to the message.
    fn send_message<'a>(
        &'a self,
        request: &'a SendMessage,
    ) -> BoxFuture<'a, Result<String, ServiceError>>;

    /// Returns the request id assigned to the scheduled message.
    fn send_scheduled_message<'a>(
        &'a self,
        request: &'a SendScheduledMessage,
    ) -> BoxFuture<'a, Result<String, ServiceError>>;

    /// Returns the status token for one recipient.
    fn get_message_status<'a>(
        &'a self,
        request: &'a GetMessageStatus,
    ) -> BoxFuture<'a, Result<String, ServiceError>>;

    /// Returns `recipient:STATUS` lines for every recipient of the request.
    fn get_all_message_statuses<'a>(
        &'a self,
        request: &'a GetAllMessageStatuses,
    ) -> BoxFuture<'a, Result<Vec<String>, ServiceError>>;
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn post_xml<'a>(
        &'a self,
        url: &'a str,
        soap_action: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;

    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    pub(crate) client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_xml<'a>(
        &'a self,
        url: &'a str,
        soap_action: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
                .header("SOAPAction", soap_action)
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }

    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

/// SOAP 1.1 binding of [`SmsFarmService`] over HTTP.
#[derive(Clone)]
pub(crate) struct SoapService {
    endpoint: String,
    namespace: String,
    http: Arc<dyn HttpTransport>,
}

impl SoapService {
    pub(crate) fn new(endpoint: String, namespace: String, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            endpoint,
            namespace,
            http,
        }
    }

    async fn call(
        &self,
        operation: Operation,
        arguments: Arguments<'_>,
    ) -> Result<SoapValue, ServiceError> {
        let call = crate::transport::encode_call(&self.namespace, operation, &arguments);
        debug!(
            operation = operation.as_str(),
            endpoint = %self.endpoint,
            "calling smsfarm operation"
        );

        let response = self
            .http
            .post_xml(&self.endpoint, &call.soap_action, call.body)
            .await
            .map_err(ServiceError::Transport)?;

        // SOAP servers answer faults with HTTP 500, so the body is inspected first.
        let decoded = crate::transport::decode_response(&response.body);
        match decoded {
            Ok(DecodedResponse::Fault(fault)) => {
                warn!(
                    operation = operation.as_str(),
                    code = %fault.code,
                    message = %fault.message,
                    "smsfarm returned a fault"
                );
                Err(ServiceError::Fault(fault))
            }
            _ if !(200..=299).contains(&response.status) => {
                let body = if response.body.trim().is_empty() {
                    None
                } else {
                    Some(response.body)
                };
                Err(ServiceError::HttpStatus {
                    status: response.status,
                    body,
                })
            }
            Ok(DecodedResponse::Value(value)) => Ok(value),
            Err(err) => Err(parse_error(err)),
        }
    }

    async fn call_scalar(
        &self,
        operation: Operation,
        arguments: Arguments<'_>,
    ) -> Result<String, ServiceError> {
        self.call(operation, arguments)
            .await?
            .into_scalar()
            .map_err(parse_error)
    }
}

impl SmsFarmService for SoapService {
    fn get_credit_amount<'a>(
        &'a self,
        request: &'a GetCreditAmount,
    ) -> BoxFuture<'a, Result<String, ServiceError>> {
        Box::pin(self.call_scalar(GetCreditAmount::OPERATION, request.arguments()))
    }

    fn send_message<'a>(
        &'a self,
        request: &'a SendMessage,
    ) -> BoxFuture<'a, Result<String, ServiceError>> {
        Box::pin(self.call_scalar(SendMessage::OPERATION, request.arguments()))
    }

    fn send_scheduled_message<'a>(
        &'a self,
        request: &'a SendScheduledMessage,
    ) -> BoxFuture<'a, Result<String, ServiceError>> {
        Box::pin(self.call_scalar(SendScheduledMessage::OPERATION, request.arguments()))
    }

    fn get_message_status<'a>(
        &'a self,
        request: &'a GetMessageStatus,
    ) -> BoxFuture<'a, Result<String, ServiceError>> {
        Box::pin(self.call_scalar(GetMessageStatus::OPERATION, request.arguments()))
    }

    fn get_all_message_statuses<'a>(
        &'a self,
        request: &'a GetAllMessageStatuses,
    ) -> BoxFuture<'a, Result<Vec<String>, ServiceError>> {
        Box::pin(async move {
            self.call(GetAllMessageStatuses::OPERATION, request.arguments())
                .await?
                .into_list()
                .map_err(parse_error)
        })
    }
}

fn parse_error(err: TransportError) -> ServiceError {
    ServiceError::Parse(Box::new(err))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{
        IntegrationCode, IntegrationId, MessageText, Recipient, RecipientSet, RequestId, Sender,
        SignedRequestBuilder,
    };

    #[derive(Debug, Clone)]
    pub(crate) struct FakeHttp {
        state: Arc<Mutex<FakeHttpState>>,
    }

    #[derive(Debug)]
    struct FakeHttpState {
        last_url: Option<String>,
        last_soap_action: Option<String>,
        last_body: Option<String>,
        response_status: u16,
        response_body: String,
    }

    impl FakeHttp {
        pub(crate) fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeHttpState {
                    last_url: None,
                    last_soap_action: None,
                    last_body: None,
                    response_status,
                    response_body: response_body.into(),
                })),
            }
        }

        pub(crate) fn last_url(&self) -> Option<String> {
            self.state.lock().unwrap().last_url.clone()
        }

        pub(crate) fn last_request(&self) -> (Option<String>, Option<String>) {
            let state = self.state.lock().unwrap();
            (state.last_soap_action.clone(), state.last_body.clone())
        }

        fn respond(&self, url: &str) -> HttpResponse {
            let mut state = self.state.lock().unwrap();
            state.last_url = Some(url.to_owned());
            HttpResponse {
                status: state.response_status,
                body: state.response_body.clone(),
            }
        }
    }

    impl HttpTransport for FakeHttp {
        fn post_xml<'a>(
            &'a self,
            url: &'a str,
            soap_action: &'a str,
            body: String,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                {
                    let mut state = self.state.lock().unwrap();
                    state.last_soap_action = Some(soap_action.to_owned());
                    state.last_body = Some(body);
                }
                Ok(self.respond(url))
            })
        }

        fn get<'a>(
            &'a self,
            url: &'a str,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move { Ok(self.respond(url)) })
        }
    }

    #[derive(Debug)]
    struct FailingHttp;

    impl HttpTransport for FailingHttp {
        fn post_xml<'a>(
            &'a self,
            _url: &'a str,
            _soap_action: &'a str,
            _body: String,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move { Err("connection refused".into()) })
        }

        fn get<'a>(
            &'a self,
            _url: &'a str,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move { Err("connection refused".into()) })
        }
    }

    fn soap_service(http: impl HttpTransport + 'static) -> SoapService {
        SoapService::new(
            "https://example.invalid/api/".to_owned(),
            "urn:smsfarm".to_owned(),
            Arc::new(http),
        )
    }

    fn scalar_response(operation: &str, value: &str) -> String {
        format!(
            r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="urn:smsfarm">
              <SOAP-ENV:Body><ns1:{operation}Response><return>{value}</return></ns1:{operation}Response></SOAP-ENV:Body>
            </SOAP-ENV:Envelope>"#
        )
    }

    const FAULT: &str = r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
      <SOAP-ENV:Body>
        <SOAP-ENV:Fault>
          <faultcode>SOAP-ENV:Server</faultcode>
          <faultstring>Invalid signature</faultstring>
        </SOAP-ENV:Fault>
      </SOAP-ENV:Body>
    </SOAP-ENV:Envelope>"#;

    struct Fixture {
        code: IntegrationCode,
        id: IntegrationId,
        sender: Sender,
        recipients: RecipientSet,
    }

    impl Fixture {
        fn new() -> Self {
            let mut recipients = RecipientSet::new();
            recipients.add(Recipient::new("900123456").unwrap());
            Self {
                code: IntegrationCode::new("some-code").unwrap(),
                id: IntegrationId::new("some-id").unwrap(),
                sender: Sender::new("shop").unwrap(),
                recipients,
            }
        }

        fn builder(&self) -> SignedRequestBuilder<'_> {
            SignedRequestBuilder::new(&self.code, &self.id, &self.sender)
        }
    }

    #[tokio::test]
    async fn send_message_posts_envelope_and_decodes_id() {
        let http = FakeHttp::new(200, scalar_response("SendMessage", "2410290"));
        let service = soap_service(http.clone());
        let fixture = Fixture::new();
        let request = fixture
            .builder()
            .send_message(&fixture.recipients, &MessageText::new("hello").unwrap())
            .unwrap();

        let id = service.send_message(&request).await.unwrap();
        assert_eq!(id, "2410290");

        assert_eq!(
            http.last_url().as_deref(),
            Some("https://example.invalid/api/")
        );
        let (soap_action, body) = http.last_request();
        assert_eq!(soap_action.as_deref(), Some("\"urn:smsfarm#SendMessage\""));
        let body = body.unwrap();
        assert!(body.contains("<ns1:SendMessage><sender>shop</sender>"));
        assert!(body.contains(&format!(
            "<signature>{}</signature>",
            request.signature().as_str()
        )));
    }

    #[tokio::test]
    async fn fault_is_decoded_even_with_http_500() {
        let service = soap_service(FakeHttp::new(500, FAULT));
        let fixture = Fixture::new();
        let request = fixture.builder().credit().unwrap();

        let err = service.get_credit_amount(&request).await.unwrap_err();
        let fault = err.fault().expect("fault");
        assert_eq!(fault.code, "SOAP-ENV:Server");
        assert_eq!(fault.message, "Invalid signature");
    }

    #[tokio::test]
    async fn non_success_status_without_fault_maps_to_http_status() {
        let service = soap_service(FakeHttp::new(502, "bad gateway"));
        let fixture = Fixture::new();
        let request = fixture.builder().credit().unwrap();

        let err = service.get_credit_amount(&request).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::HttpStatus {
                status: 502,
                body: Some(_)
            }
        ));

        let service = soap_service(FakeHttp::new(503, "  "));
        let err = service.get_credit_amount(&request).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::HttpStatus {
                status: 503,
                body: None
            }
        ));
    }

    #[tokio::test]
    async fn invalid_body_maps_to_parse_error() {
        let service = soap_service(FakeHttp::new(200, "{ not soap }"));
        let fixture = Fixture::new();
        let request = fixture.builder().credit().unwrap();

        let err = service.get_credit_amount(&request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Parse(_)));
    }

    #[tokio::test]
    async fn transport_failure_maps_to_transport_error() {
        let service = soap_service(FailingHttp);
        let fixture = Fixture::new();
        let request = fixture.builder().credit().unwrap();

        let err = service.get_credit_amount(&request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
    }

    #[tokio::test]
    async fn all_statuses_decode_array_items() {
        let body = r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
          <SOAP-ENV:Body>
            <ns1:GetAllMessageStatusesResponse xmlns:ns1="urn:smsfarm">
              <return>
                <item>421900123456:MESSAGE-EXPIRED</item>
                <item>421900654321:DELIVERED</item>
              </return>
            </ns1:GetAllMessageStatusesResponse>
          </SOAP-ENV:Body>
        </SOAP-ENV:Envelope>"#;
        let http = FakeHttp::new(200, body);
        let service = soap_service(http.clone());
        let fixture = Fixture::new();
        let request = fixture
            .builder()
            .all_message_statuses(&RequestId::new("2410290").unwrap())
            .unwrap();

        let lines = service.get_all_message_statuses(&request).await.unwrap();
        assert_eq!(
            lines,
            vec!["421900123456:MESSAGE-EXPIRED", "421900654321:DELIVERED"]
        );

        let (soap_action, body) = http.last_request();
        assert_eq!(
            soap_action.as_deref(),
            Some("\"urn:smsfarm#GetAllMessageStatuses\"")
        );
        assert!(body.unwrap().contains(
            "<ns1:GetAllMessageStatuses><integration_id>some-id</integration_id>\
             <request_id>2410290</request_id>"
        ));
    }

    #[tokio::test]
    async fn scalar_operation_rejects_array_result() {
        let body = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
          <s:Body><r:GetMessageStatusResponse xmlns:r="urn:x">
            <return><item>DELIVERED</item></return>
          </r:GetMessageStatusResponse></s:Body>
        </s:Envelope>"#;
        let service = soap_service(FakeHttp::new(200, body));
        let fixture = Fixture::new();
        let request = fixture
            .builder()
            .message_status(
                &RequestId::new("1").unwrap(),
                &Recipient::new("900123456").unwrap(),
            )
            .unwrap();

        let err = service.get_message_status(&request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Parse(_)));
    }
}
