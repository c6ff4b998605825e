use chrono::{Local, NaiveDateTime};

use crate::domain::value::{Channel, CurrencyCode};
use crate::transport::XmlError;

/// Wire format of `DATEREQUEST`.
pub const DATE_REQUEST_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Insertion-ordered request fields.
///
/// Keys are unique. Overwriting a key with [`RequestFields::set`] replaces the
/// value but keeps the position of the first insertion.
pub struct RequestFields {
    entries: Vec<(String, String)>,
}

impl RequestFields {
    /// XML element name of the request timestamp (`DATEREQUEST`).
    pub const DATE_REQUEST: &'static str = "DATEREQUEST";

    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, overwriting any previous value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate without touching `DATEREQUEST`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Stamp `DATEREQUEST` with the local wall clock and return all fields in order.
    pub fn fields(&mut self) -> &[(String, String)] {
        self.fields_at(Local::now().naive_local())
    }

    /// Stamp `DATEREQUEST` with `now` and return all fields in order.
    pub fn fields_at(&mut self, now: NaiveDateTime) -> &[(String, String)] {
        self.set(
            Self::DATE_REQUEST,
            now.format(DATE_REQUEST_FORMAT).to_string(),
        );
        &self.entries
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Root element of a request document, e.g. `<CHARGETOBILLREQUEST/>`.
pub struct XmlTemplate {
    name: String,
    attributes: Vec<(String, String)>,
}

impl XmlTemplate {
    /// Parse a well-formed empty root element, optionally preceded by an XML declaration.
    pub fn parse(input: &str) -> Result<Self, XmlError> {
        let (name, attributes) = crate::transport::parse_xml_template(input)?;
        Ok(Self { name, attributes })
    }

    /// Template for a bare root element with no attributes.
    pub(crate) fn element(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            attributes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in document order, values unescaped.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Gateway operations supported by this crate.
pub enum Operation {
    /// Charge an amount to the subscriber's mobile bill.
    ChargeToBill,
}

impl Operation {
    /// Path relative to the API base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::ChargeToBill => "chargetobill.htm",
        }
    }

    /// Root element name of the request document.
    pub fn root_element(self) -> &'static str {
        match self {
            Self::ChargeToBill => "CHARGETOBILLREQUEST",
        }
    }

    pub fn template(self) -> XmlTemplate {
        XmlTemplate::element(self.root_element())
    }
}

#[derive(Debug, Clone, Default)]
/// Optional charge parameters; defaults are channel `1` and currency `EUR`.
pub struct ChargeOptions {
    pub channel: Channel,
    pub currency: CurrencyCode,
}

#[derive(Debug, Clone)]
/// One outbound request: fields, root element and endpoint.
///
/// Build a fresh envelope per attempt; `DATEREQUEST` is stamped when the
/// envelope is rendered.
pub struct RequestEnvelope {
    fields: RequestFields,
    template: XmlTemplate,
    endpoint: String,
}

impl RequestEnvelope {
    /// Create an envelope from a raw root-element template.
    ///
    /// A malformed template is rejected here rather than at send time.
    pub fn new(template: &str, endpoint: impl Into<String>) -> Result<Self, XmlError> {
        Ok(Self {
            fields: RequestFields::new(),
            template: XmlTemplate::parse(template)?,
            endpoint: endpoint.into(),
        })
    }

    /// Create an envelope for a known operation.
    pub fn for_operation(operation: Operation, fields: RequestFields) -> Self {
        Self {
            fields,
            template: operation.template(),
            endpoint: operation.endpoint().to_owned(),
        }
    }

    pub fn fields(&self) -> &RequestFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut RequestFields {
        &mut self.fields
    }

    pub fn template(&self) -> &XmlTemplate {
        &self.template
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Render the request document, stamping `DATEREQUEST` with the local wall clock.
    pub fn to_xml(&mut self) -> Result<String, XmlError> {
        self.to_xml_at(Local::now().naive_local())
    }

    /// Render the request document, stamping `DATEREQUEST` with `now`.
    pub fn to_xml_at(&mut self, now: NaiveDateTime) -> Result<String, XmlError> {
        let fields = self.fields.fields_at(now);
        crate::transport::encode_request_xml(&self.template, fields)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn keys(fields: &[(String, String)]) -> Vec<&str> {
        fields.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn overwrite_keeps_first_insertion_position() {
        let mut fields = RequestFields::new();
        fields.set("A", "1");
        fields.set("B", "2");
        fields.set("C", "3");
        fields.set("A", "10");
        fields.set("B", "20");
        fields.set("A", "100");

        assert_eq!(fields.len(), 3);
        assert_eq!(
            fields.iter().collect::<Vec<_>>(),
            vec![("A", "100"), ("B", "20"), ("C", "3")]
        );
    }

    #[test]
    fn fields_at_appends_then_refreshes_date_request() {
        let mut fields = RequestFields::new();
        fields.set("USERNAME", "merchant");

        let first = fields.fields_at(at(10, 0, 0)).to_vec();
        assert_eq!(keys(&first), vec!["USERNAME", "DATEREQUEST"]);
        assert_eq!(first[1].1, "2014-03-07 10:00:00");

        fields.set("MSISDN", "353871234567");
        let second = fields.fields_at(at(10, 0, 1)).to_vec();
        assert_eq!(keys(&second), vec!["USERNAME", "DATEREQUEST", "MSISDN"]);
        assert_eq!(second[1].1, "2014-03-07 10:00:01");
    }

    #[test]
    fn fields_stamps_wall_clock_in_wire_format() {
        let mut fields = RequestFields::new();
        let stamped = fields.fields()[0].1.clone();
        assert!(NaiveDateTime::parse_from_str(&stamped, DATE_REQUEST_FORMAT).is_ok());
        assert_eq!(stamped.len(), "2014-03-07 10:00:00".len());
    }

    #[test]
    fn iter_does_not_stamp_date_request() {
        let mut fields = RequestFields::new();
        fields.set("A", "1");
        assert_eq!(fields.iter().count(), 1);
        assert!(!fields.contains(RequestFields::DATE_REQUEST));
    }

    #[test]
    fn operation_charge_to_bill_wire_names() {
        assert_eq!(Operation::ChargeToBill.endpoint(), "chargetobill.htm");
        assert_eq!(
            Operation::ChargeToBill.template().name(),
            "CHARGETOBILLREQUEST"
        );
    }

    #[test]
    fn envelope_rejects_malformed_template_at_construction() {
        assert!(RequestEnvelope::new("<CHARGETOBILLREQUEST", "chargetobill.htm").is_err());
        assert!(RequestEnvelope::new("", "chargetobill.htm").is_err());

        let envelope =
            RequestEnvelope::new("<CHARGETOBILLREQUEST/>", "chargetobill.htm").unwrap();
        assert_eq!(envelope.template().name(), "CHARGETOBILLREQUEST");
        assert_eq!(envelope.endpoint(), "chargetobill.htm");
    }

    #[test]
    fn serializations_one_second_apart_differ_only_in_date_request() {
        let mut envelope =
            RequestEnvelope::for_operation(Operation::ChargeToBill, RequestFields::new());
        envelope.fields_mut().set("REFERENCE", "test");

        let first = envelope.to_xml_at(at(12, 30, 0)).unwrap();
        let second = envelope.to_xml_at(at(12, 30, 1)).unwrap();

        assert_ne!(first, second);
        assert!(first.contains("<DATEREQUEST>2014-03-07 12:30:00</DATEREQUEST>"));
        assert!(second.contains("<DATEREQUEST>2014-03-07 12:30:01</DATEREQUEST>"));
        assert_eq!(
            first.replace("12:30:00", "12:30:01"),
            second,
            "only DATEREQUEST may change between renders"
        );
    }
}
