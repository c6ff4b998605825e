//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    ChargeOptions, DATE_REQUEST_FORMAT, Operation, RequestEnvelope, RequestFields, XmlTemplate,
};
pub use response::{Outcome, ResponseError, ResponseRecord, classify};
pub use validation::ValidationError;
pub use value::{
    Channel, ContentDescription, ContentId, CurrencyCode, ErrorCategory, Msisdn, OperatorId,
    Password, Reference, ResponseCode, ResponseStatus, TransactionAmount, Username,
};
