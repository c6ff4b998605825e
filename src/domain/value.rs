use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Merchant account username (`USERNAME`).
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// XML element name used by the gateway (`USERNAME`).
    pub const FIELD: &'static str = "USERNAME";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(trimmed_non_empty(Self::FIELD, value)?))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Merchant account password (`PASSWORD`).
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// XML element name used by the gateway (`PASSWORD`).
    pub const FIELD: &'static str = "PASSWORD";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Content identifier registered with the gateway (`CONTENTID`).
///
/// Invariant: non-empty after trimming.
pub struct ContentId(String);

impl ContentId {
    /// XML element name used by the gateway (`CONTENTID`).
    pub const FIELD: &'static str = "CONTENTID";

    /// Create a validated [`ContentId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(trimmed_non_empty(Self::FIELD, value)?))
    }

    /// Borrow the validated content id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Human-readable description of the purchased content (`CONTENTDESCRIPTION`).
///
/// Invariant: non-empty after trimming. The original value is preserved.
pub struct ContentDescription(String);

impl ContentDescription {
    /// XML element name used by the gateway (`CONTENTDESCRIPTION`).
    pub const FIELD: &'static str = "CONTENTDESCRIPTION";

    /// Create a validated [`ContentDescription`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the description as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Subscriber mobile number in international format without a `+` (`MSISDN`).
///
/// Invariant: non-empty, ASCII digits only, e.g. `353871234567`.
pub struct Msisdn(String);

impl Msisdn {
    /// XML element name used by the gateway (`MSISDN`).
    pub const FIELD: &'static str = "MSISDN";

    /// Create a validated MSISDN from an already-international number.
    ///
    /// Surrounding whitespace and a single leading `+` are stripped.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
        Ok(Self(digits_only(Self::FIELD, trimmed)?))
    }

    /// Parse a phone number in any format accepted by `phonenumber` and
    /// normalize it into international digits.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, raw).map_err(|_| {
            ValidationError::InvalidPhoneNumber {
                input: raw.to_owned(),
            }
        })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();
        Self::new(e164)
    }

    /// Digits as sent to the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Mobile network operator identifier (`OPERATORID`).
///
/// Invariant: non-empty after trimming.
pub struct OperatorId(String);

impl OperatorId {
    /// XML element name used by the gateway (`OPERATORID`).
    pub const FIELD: &'static str = "OPERATORID";

    /// Create a validated [`OperatorId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(trimmed_non_empty(Self::FIELD, value)?))
    }

    /// Borrow the validated operator id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Amount to charge in minor currency units, e.g. cents (`TRANSACTIONAMOUNT`).
///
/// Invariant: ASCII digits only. Upper limits are enforced by the gateway.
pub struct TransactionAmount(String);

impl TransactionAmount {
    /// XML element name used by the gateway (`TRANSACTIONAMOUNT`).
    pub const FIELD: &'static str = "TRANSACTIONAMOUNT";

    /// Create a validated amount from its decimal string form.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        Ok(Self(digits_only(Self::FIELD, value.trim())?))
    }

    /// Create an amount from an integer number of minor units.
    pub fn from_minor_units(value: u32) -> Self {
        Self(value.to_string())
    }

    /// Borrow the amount as sent to the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Free-text merchant reference for the transaction (`REFERENCE`).
///
/// Invariant: non-empty after trimming. The original value is preserved.
pub struct Reference(String);

impl Reference {
    /// XML element name used by the gateway (`REFERENCE`).
    pub const FIELD: &'static str = "REFERENCE";

    /// Create a validated [`Reference`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the reference as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Provider-defined payment channel (`CHANNEL`).
///
/// Invariant: ASCII digits only. Defaults to `1`.
pub struct Channel(String);

impl Channel {
    /// XML element name used by the gateway (`CHANNEL`).
    pub const FIELD: &'static str = "CHANNEL";

    /// Create a validated [`Channel`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        Ok(Self(digits_only(Self::FIELD, value.trim())?))
    }

    /// Borrow the channel as sent to the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self("1".to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// ISO 4217 alphabetic currency code (`CURRENCYCODE`).
///
/// Invariant: exactly three ASCII letters, stored upper-case. Defaults to `EUR`.
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// XML element name used by the gateway (`CURRENCYCODE`).
    pub const FIELD: &'static str = "CURRENCYCODE";

    /// Create a validated [`CurrencyCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.len() != 3 || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrencyCode {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Borrow the upper-case currency code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self("EUR".to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway response code (`RESPONSECODE`).
///
/// The raw text is preserved as-is even when the code is unknown or not numeric.
pub struct ResponseCode(String);

impl ResponseCode {
    /// XML element name used by the gateway (`RESPONSECODE`).
    pub const FIELD: &'static str = "RESPONSECODE";

    /// Wrap a response code exactly as received.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the code as received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, if the trimmed code consists of ASCII digits only.
    pub fn as_u32(&self) -> Option<u32> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse().ok()
    }

    /// Look the code up in the gateway's response code table.
    pub fn status(&self) -> ResponseStatus {
        match self.as_u32() {
            Some(code) => ResponseStatus::from_code(code),
            None => ResponseStatus::Failed(ErrorCategory::GenericError),
        }
    }

    /// Returns `true` for the two success codes (`1600`, `1601`).
    pub fn is_success(&self) -> bool {
        self.status() == ResponseStatus::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Result of looking a [`ResponseCode`] up in the response code table.
pub enum ResponseStatus {
    Success,
    Failed(ErrorCategory),
}

impl ResponseStatus {
    /// Map a numeric response code. Codes outside the table are [`ErrorCategory::GenericError`].
    pub fn from_code(code: u32) -> Self {
        let category = match code {
            1600 | 1601 => return Self::Success,
            1001..=1009
            | 1031..=1035
            | 1101
            | 1103
            | 1105..=1109
            | 1131..=1135
            | 1300..=1309 => ErrorCategory::InvalidRequest,
            1200..=1202 => ErrorCategory::AuthenticationError,
            1400..=1402 | 1500 => ErrorCategory::ConnectionError,
            1102 | 1501..=1503 | 1506 => ErrorCategory::InvalidNumber,
            1504 | 1505 | 1507 | 1508 => ErrorCategory::TransactionError,
            _ => ErrorCategory::GenericError,
        };
        Self::Failed(category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Closed set of failure categories reported by the gateway.
pub enum ErrorCategory {
    /// Request parameters were rejected by gateway validation.
    InvalidRequest,
    /// Merchant credentials were rejected.
    AuthenticationError,
    /// Gateway-side connectivity or session failure.
    ConnectionError,
    /// The subscriber number is invalid or not eligible for billing.
    InvalidNumber,
    /// The transaction itself failed, e.g. a limit was exceeded or it was declined.
    TransactionError,
    /// Unknown or missing response code.
    GenericError,
}

impl ErrorCategory {
    /// Whether a fresh attempt may succeed without changing the request.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::ConnectionError)
    }

    /// Whether the failure is caused by the subscriber rather than the merchant setup.
    pub fn is_user_facing(self) -> bool {
        matches!(self, Self::InvalidNumber | Self::TransactionError)
    }
}

fn trimmed_non_empty(
    field: &'static str,
    value: impl Into<String>,
) -> Result<String, ValidationError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

fn digits_only(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotNumeric {
            field,
            input: value.to_owned(),
        });
    }
    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_newtypes_trim_or_validate() {
        let username = Username::new("  merchant ").unwrap();
        assert_eq!(username.as_str(), "merchant");
        assert!(Username::new("  ").is_err());

        let password = Password::new(" secret ").unwrap();
        assert_eq!(password.as_str(), " secret ");
        assert!(Password::new("").is_err());

        let content = ContentId::new(" 999999 ").unwrap();
        assert_eq!(content.as_str(), "999999");

        let description = ContentDescription::new(" Ringtone ").unwrap();
        assert_eq!(description.as_str(), " Ringtone ");
        assert!(ContentDescription::new(" ").is_err());

        let reference = Reference::new("order 42").unwrap();
        assert_eq!(reference.as_str(), "order 42");
        assert!(Reference::new("").is_err());

        let operator = OperatorId::new(" 3 ").unwrap();
        assert_eq!(operator.as_str(), "3");
    }

    #[test]
    fn password_debug_is_redacted() {
        let password = Password::new("hunter2").unwrap();
        assert_eq!(format!("{password:?}"), "Password(***)");
    }

    #[test]
    fn msisdn_accepts_international_digits() {
        assert_eq!(
            Msisdn::new(" 353871234567 ").unwrap().as_str(),
            "353871234567"
        );
        assert_eq!(Msisdn::new("+353871234567").unwrap().as_str(), "353871234567");
        assert!(matches!(
            Msisdn::new(""),
            Err(ValidationError::Empty {
                field: Msisdn::FIELD
            })
        ));
        assert!(matches!(
            Msisdn::new("353 87 123"),
            Err(ValidationError::NotNumeric { .. })
        ));
    }

    #[test]
    fn msisdn_parse_normalizes_national_format() {
        let msisdn = Msisdn::parse(Some(country::Id::IE), "087 123 4567").unwrap();
        assert_eq!(msisdn.as_str(), "353871234567");

        let msisdn = Msisdn::parse(None, "+353 87 123 4567").unwrap();
        assert_eq!(msisdn.as_str(), "353871234567");

        assert!(Msisdn::parse(None, "not-a-number").is_err());
    }

    #[test]
    fn amount_and_channel_must_be_digits() {
        assert_eq!(TransactionAmount::new("100").unwrap().as_str(), "100");
        assert_eq!(TransactionAmount::from_minor_units(250).as_str(), "250");
        assert!(TransactionAmount::new("1.00").is_err());
        assert!(TransactionAmount::new("").is_err());

        assert_eq!(Channel::default().as_str(), "1");
        assert_eq!(Channel::new("2").unwrap().as_str(), "2");
        assert!(Channel::new("web").is_err());
    }

    #[test]
    fn currency_code_is_three_letters_upper_case() {
        assert_eq!(CurrencyCode::default().as_str(), "EUR");
        assert_eq!(CurrencyCode::new("gbp").unwrap().as_str(), "GBP");
        assert!(CurrencyCode::new("EU").is_err());
        assert!(CurrencyCode::new("E1R").is_err());
    }

    #[test]
    fn response_code_parses_digits_only() {
        assert_eq!(ResponseCode::new("1600").as_u32(), Some(1600));
        assert_eq!(ResponseCode::new(" 1600 ").as_u32(), Some(1600));
        assert_eq!(ResponseCode::new("+1600").as_u32(), None);
        assert_eq!(ResponseCode::new("").as_u32(), None);
        assert_eq!(ResponseCode::new("OK").as_u32(), None);
    }

    #[test]
    fn response_status_table_boundaries() {
        use ErrorCategory::*;

        assert_eq!(ResponseStatus::from_code(1600), ResponseStatus::Success);
        assert_eq!(ResponseStatus::from_code(1601), ResponseStatus::Success);

        let cases = [
            (1000, GenericError),
            (1001, InvalidRequest),
            (1009, InvalidRequest),
            (1010, GenericError),
            (1030, GenericError),
            (1031, InvalidRequest),
            (1035, InvalidRequest),
            (1036, GenericError),
            (1100, GenericError),
            (1101, InvalidRequest),
            (1102, InvalidNumber),
            (1103, InvalidRequest),
            (1104, GenericError),
            (1105, InvalidRequest),
            (1109, InvalidRequest),
            (1110, GenericError),
            (1131, InvalidRequest),
            (1135, InvalidRequest),
            (1136, GenericError),
            (1199, GenericError),
            (1200, AuthenticationError),
            (1202, AuthenticationError),
            (1203, GenericError),
            (1299, GenericError),
            (1300, InvalidRequest),
            (1309, InvalidRequest),
            (1310, GenericError),
            (1399, GenericError),
            (1400, ConnectionError),
            (1402, ConnectionError),
            (1403, GenericError),
            (1500, ConnectionError),
            (1501, InvalidNumber),
            (1503, InvalidNumber),
            (1504, TransactionError),
            (1505, TransactionError),
            (1506, InvalidNumber),
            (1507, TransactionError),
            (1508, TransactionError),
            (1509, GenericError),
            (1599, GenericError),
            (1602, GenericError),
            (9999, GenericError),
        ];
        for (code, category) in cases {
            assert_eq!(
                ResponseStatus::from_code(code),
                ResponseStatus::Failed(category),
                "code {code}"
            );
        }
    }

    #[test]
    fn response_code_status_handles_non_numeric() {
        assert!(ResponseCode::new("1601").is_success());
        assert!(!ResponseCode::new("1202").is_success());
        assert_eq!(
            ResponseCode::new("n/a").status(),
            ResponseStatus::Failed(ErrorCategory::GenericError)
        );
    }

    #[test]
    fn error_category_helpers() {
        assert!(ErrorCategory::ConnectionError.is_retryable());
        assert!(!ErrorCategory::AuthenticationError.is_retryable());
        assert!(ErrorCategory::InvalidNumber.is_user_facing());
        assert!(ErrorCategory::TransactionError.is_user_facing());
        assert!(!ErrorCategory::InvalidRequest.is_user_facing());
    }
}
