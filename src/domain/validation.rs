use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    NotNumeric { field: &'static str, input: String },
    InvalidPhoneNumber { input: String },
    InvalidCurrencyCode { input: String },
    MissingOperation,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::NotNumeric { field, input } => {
                write!(f, "{field} must contain only digits: {input}")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidCurrencyCode { input } => {
                write!(f, "invalid currency code: {input} (expected three letters)")
            }
            Self::MissingOperation => {
                write!(f, "no operation selected; call charge() before sending")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
