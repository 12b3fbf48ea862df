//! Typed Rust client for the smsfarm.sk SOAP API.
//!
//! The crate is split into a domain layer of validated types (credentials, recipients, request
//! signatures, the [`ResponseEnvelope`] result wrapper), a transport layer for the SOAP wire
//! format, and a small client layer orchestrating calls.
//!
//! Every operation validates its input locally and then performs exactly one remote call.
//! Remote failures (SOAP faults, HTTP errors) are returned inside the envelope; only invalid
//! local input is returned as an [`SmsFarmError`].
//!
//! ```rust,no_run
//! use smsfarm::{Recipient, SmsFarmClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smsfarm::SmsFarmError> {
//!     let mut client = SmsFarmClient::builder("integration-code", "integration-id")
//!         .sender("my-shop")
//!         .build()?;
//!     client.add_recipients(Recipient::new("421900123456")?);
//!
//!     let response = client.send_message("hello").await?;
//!     match response.data() {
//!         Some(request_id) => println!("accepted as {request_id}"),
//!         None => println!("rejected: {:?}", response.error()),
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{BoxFuture, SmsFarmClient, SmsFarmClientBuilder, SmsFarmError, SmsFarmService};
pub use domain::{
    AmbiguousRecipient, Credit, IntegrationCode, IntegrationId, KnownStatus, MessageStatuses,
    MessageText, Recipient, RecipientInput, RecipientSet, RemoteFault, RequestId,
    ResponseEnvelope, SendTime, Sender, ServiceError, Signature, SignedRequestBuilder,
    StatusToken, ValidationError,
};
