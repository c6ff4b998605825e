use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value::{ErrorCategory, ResponseCode, ResponseStatus};

/// Outcome of classifying a gateway response.
pub type Outcome = Result<ResponseRecord, ResponseError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Flat field map decoded from a gateway reply.
pub struct ResponseRecord(BTreeMap<String, String>);

impl ResponseRecord {
    /// XML element name of the human-readable status (`RESPONSETEXT`).
    pub const RESPONSE_TEXT: &'static str = "RESPONSETEXT";

    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Raw `RESPONSECODE`, if present.
    pub fn response_code(&self) -> Option<ResponseCode> {
        self.get(ResponseCode::FIELD).map(ResponseCode::new)
    }

    /// Raw `RESPONSETEXT`, if present.
    pub fn response_text(&self) -> Option<&str> {
        self.get(Self::RESPONSE_TEXT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for ResponseRecord {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self(value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResponseRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A gateway reply that did not report success.
///
/// Displays as `"{RESPONSETEXT} (#{RESPONSECODE})"`.
pub struct ResponseError {
    pub category: ErrorCategory,
    pub code: Option<String>,
    pub text: Option<String>,
    pub record: ResponseRecord,
}

impl ResponseError {
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    /// Formatted message, identical to the `Display` output.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (#{})",
            self.text.as_deref().unwrap_or_default(),
            self.code.as_deref().unwrap_or_default()
        )
    }
}

impl std::error::Error for ResponseError {}

/// Classify a decoded reply by its `RESPONSECODE`.
///
/// Success codes return the record unchanged. A reply missing either
/// `RESPONSECODE` or `RESPONSETEXT` is [`ErrorCategory::GenericError`].
pub fn classify(record: ResponseRecord) -> Outcome {
    let code = record.response_code();
    let text = record.response_text().map(str::to_owned);

    let status = match (&code, &text) {
        (Some(code), Some(_)) => code.status(),
        _ => ResponseStatus::Failed(ErrorCategory::GenericError),
    };

    match status {
        ResponseStatus::Success => Ok(record),
        ResponseStatus::Failed(category) => Err(ResponseError {
            category,
            code: code.map(|c| c.as_str().to_owned()),
            text,
            record,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, text: &str) -> ResponseRecord {
        [("RESPONSECODE", code), ("RESPONSETEXT", text)]
            .into_iter()
            .collect()
    }

    fn category_of(code: &str) -> Option<ErrorCategory> {
        classify(record(code, "text")).err().map(|err| err.category)
    }

    #[test]
    fn success_returns_record_unchanged() {
        let mut fields = BTreeMap::new();
        fields.insert("RESPONSECODE".to_owned(), "1600".to_owned());
        fields.insert("RESPONSETEXT".to_owned(), "OK".to_owned());
        fields.insert("TRANSACTIONID".to_owned(), "T-1".to_owned());
        let input = ResponseRecord::new(fields);

        let output = classify(input.clone()).unwrap();
        assert_eq!(output, input);
        assert!(classify(record("1601", "Pending")).is_ok());
    }

    #[test]
    fn authentication_error_message_format() {
        let err = classify(record("1202", "Bad credentials")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::AuthenticationError);
        assert_eq!(err.message(), "Bad credentials (#1202)");
        assert_eq!(err.code.as_deref(), Some("1202"));
        assert_eq!(err.text.as_deref(), Some("Bad credentials"));
    }

    #[test]
    fn every_listed_code_maps_to_its_category() {
        use ErrorCategory::*;

        let invalid_request = (1001..=1009)
            .chain(1031..=1035)
            .chain([1101, 1103])
            .chain(1105..=1109)
            .chain(1131..=1135)
            .chain(1300..=1309);
        for code in invalid_request {
            assert_eq!(category_of(&code.to_string()), Some(InvalidRequest), "{code}");
        }

        let table: [(&[u32], ErrorCategory); 4] = [
            (&[1200, 1201, 1202], AuthenticationError),
            (&[1400, 1401, 1402, 1500], ConnectionError),
            (&[1102, 1501, 1502, 1503, 1506], InvalidNumber),
            (&[1504, 1505, 1507, 1508], TransactionError),
        ];
        for (codes, category) in table {
            for code in codes {
                assert_eq!(category_of(&code.to_string()), Some(category), "{code}");
            }
        }
    }

    #[test]
    fn failure_messages_include_text_and_code() {
        let err = classify(record("1503", "Number blocked")).unwrap_err();
        assert_eq!(err.to_string(), "Number blocked (#1503)");

        let err = classify(record("1109", "Invalid field")).unwrap_err();
        assert_eq!(err.category, ErrorCategory::InvalidRequest);
        assert_eq!(err.to_string(), "Invalid field (#1109)");
    }

    #[test]
    fn unknown_and_unparsable_codes_are_generic() {
        assert_eq!(category_of("9999"), Some(ErrorCategory::GenericError));
        assert_eq!(category_of("abc"), Some(ErrorCategory::GenericError));
        assert_eq!(category_of(""), Some(ErrorCategory::GenericError));

        let err = classify(record("9999", "Something odd")).unwrap_err();
        assert_eq!(err.to_string(), "Something odd (#9999)");
    }

    #[test]
    fn missing_code_or_text_is_generic() {
        let missing_code: ResponseRecord = [("RESPONSETEXT", "OK")].into_iter().collect();
        let err = classify(missing_code).unwrap_err();
        assert_eq!(err.category, ErrorCategory::GenericError);
        assert_eq!(err.to_string(), "OK (#)");

        let missing_text: ResponseRecord = [("RESPONSECODE", "1600")].into_iter().collect();
        let err = classify(missing_text).unwrap_err();
        assert_eq!(err.category, ErrorCategory::GenericError);
        assert_eq!(err.to_string(), " (#1600)");
    }

    #[test]
    fn record_serializes_as_flat_map() {
        let record = record("1600", "OK");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"RESPONSECODE":"1600","RESPONSETEXT":"OK"}"#);
    }
}
