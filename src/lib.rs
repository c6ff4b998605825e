//! Typed Rust client for the 2Bill charge-to-mobile-bill XML API.
//!
//! The crate is split into a domain layer of strong types, a transport layer
//! for the XML wire format, and a small client layer orchestrating the HTTP
//! exchange and classifying gateway response codes.
//!
//! ```rust,no_run
//! use mobilebill::{
//!     ChargeOptions, ContentDescription, ContentId, Credentials, MobileBillClient, Msisdn,
//!     Reference, TransactionAmount,
//! };
//!
//! fn main() -> Result<(), mobilebill::MobileBillError> {
//!     let client = MobileBillClient::new(Credentials::new("username", "password")?)?;
//!     let _record = client
//!         .transaction()
//!         .content(
//!             ContentId::new("999999")?,
//!             ContentDescription::new("The content description goes here")?,
//!         )
//!         .phone(Msisdn::new("353871234567")?, None)
//!         .charge(
//!             TransactionAmount::new("100")?,
//!             Reference::new("This is a test transaction")?,
//!             ChargeOptions::default(),
//!         )
//!         .send()?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    Credentials, HttpResponse, HttpTransport, MobileBillClient, MobileBillClientBuilder,
    MobileBillError, Transaction,
};
pub use domain::{
    Channel, ChargeOptions, ContentDescription, ContentId, CurrencyCode, ErrorCategory, Msisdn,
    Operation, OperatorId, Outcome, Password, Reference, RequestEnvelope, RequestFields,
    ResponseCode, ResponseError, ResponseRecord, ResponseStatus, TransactionAmount, Username,
    ValidationError, XmlTemplate, classify,
};
pub use transport::XmlError;
