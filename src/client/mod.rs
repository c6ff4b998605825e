//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::domain::{
    Channel, ChargeOptions, ContentDescription, ContentId, CurrencyCode, ErrorCategory, Msisdn,
    Operation, OperatorId, Password, Reference, RequestEnvelope, RequestFields, ResponseCode,
    ResponseError, ResponseRecord, TransactionAmount, Username, ValidationError, classify,
};
use crate::transport::XmlError;

const DEFAULT_BASE_URL: &str = "https://www.allpointsmessaging.com/mno/api/";

#[derive(Debug, Clone)]
/// Raw HTTP reply as returned by an [`HttpTransport`].
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Blocking HTTP seam used by [`MobileBillClient`].
///
/// Implementations POST `body` to `url` with `content-type: text/xml` and
/// return the status and body. Timeouts and connection reuse are up to the
/// implementation.
pub trait HttpTransport: Send + Sync {
    fn post_xml(
        &self,
        url: &str,
        body: String,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_xml(
        &self,
        url: &str,
        body: String,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, Clone)]
/// Merchant credentials sent with every request.
pub struct Credentials {
    username: Username,
    password: Password,
}

impl Credentials {
    /// Validate that both parts are non-empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    fn push_fields(&self, fields: &mut RequestFields) {
        fields.set(Username::FIELD, self.username.as_str());
        fields.set(Password::FIELD, self.password.as_str());
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`MobileBillClient`].
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - gateway failures classified by response code,
/// - validation/parse failures.
pub enum MobileBillError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The gateway answered with a non-success response code.
    #[error("{0}")]
    Response(#[from] ResponseError),

    /// A request or response document could not be written or read.
    #[error("XML error: {0}")]
    Parse(#[from] XmlError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The configured base URL cannot be joined with an endpoint.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl MobileBillError {
    /// Response category when the gateway rejected the request.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Response(err) => Some(err.category),
            _ => None,
        }
    }
}

#[derive(Clone)]
/// Builder for [`MobileBillClient`].
///
/// Use this when you need to customize the base URL, timeout, user-agent or
/// the HTTP transport itself.
pub struct MobileBillClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl MobileBillClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
            transport: None,
        }
    }

    /// Override the API base URL; endpoint paths are resolved against it.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
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

    /// Use a custom transport instead of the bundled `reqwest` one.
    ///
    /// `timeout` and `user_agent` only apply to the bundled transport.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build a [`MobileBillClient`].
    pub fn build(self) -> Result<MobileBillClient, MobileBillError> {
        let mut base_url = self.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Url::parse(&base_url)?;

        let timeout = if self.transport.is_some() {
            None
        } else {
            self.timeout
        };
        let http: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::blocking::Client::builder().timeout(self.timeout);
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                let client = builder
                    .build()
                    .map_err(|err| MobileBillError::Transport(Box::new(err)))?;
                Arc::new(ReqwestTransport { client })
            }
        };

        Ok(MobileBillClient {
            credentials: self.credentials,
            base_url,
            timeout,
            http,
        })
    }
}

#[derive(Clone)]
/// High-level charge-to-mobile-bill client.
///
/// This type orchestrates request rendering, the HTTP exchange and response
/// classification. By default it targets
/// `https://www.allpointsmessaging.com/mno/api/`.
pub struct MobileBillClient {
    credentials: Credentials,
    base_url: String,
    timeout: Option<Duration>,
    http: Arc<dyn HttpTransport>,
}

impl MobileBillClient {
    /// Create a client using the default base URL and `reqwest` transport.
    ///
    /// For more customization, use [`MobileBillClient::builder`].
    /// No request timeout is set; use the builder to configure one.
    pub fn new(credentials: Credentials) -> Result<Self, MobileBillError> {
        Self::builder(credentials).build()
    }

    /// Request timeout applied by the bundled transport, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> MobileBillClientBuilder {
        MobileBillClientBuilder::new(credentials)
    }

    /// Start a new transaction with the client's credentials already set.
    pub fn transaction(&self) -> Transaction<'_> {
        let mut fields = RequestFields::new();
        self.credentials.push_fields(&mut fields);
        Transaction {
            client: self,
            fields,
            operation: None,
        }
    }

    /// Render, POST and classify one request envelope.
    ///
    /// Errors:
    /// - [`MobileBillError::Transport`] when no reply was received,
    /// - [`MobileBillError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`MobileBillError::Parse`] when the reply is not a flat XML document,
    /// - [`MobileBillError::Response`] when the response code is not a success code.
    pub fn send(&self, mut envelope: RequestEnvelope) -> Result<ResponseRecord, MobileBillError> {
        let url = Url::parse(&self.base_url)?.join(envelope.endpoint())?;
        let body = envelope.to_xml()?;

        tracing::debug!(url = %url, endpoint = envelope.endpoint(), "sending mobile bill request");

        let response = self
            .http
            .post_xml(url.as_str(), body)
            .map_err(MobileBillError::Transport)?;

        if !(200..=299).contains(&response.status) {
            tracing::warn!(status = response.status, "mobile bill gateway returned HTTP error");
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(MobileBillError::HttpStatus {
                status: response.status,
                body,
            });
        }

        let record = crate::transport::decode_response_xml(&response.body)?;
        tracing::debug!(
            code = record.get(ResponseCode::FIELD),
            "received mobile bill response"
        );

        classify(record).map_err(|err| {
            tracing::warn!(
                category = ?err.category,
                code = err.code.as_deref(),
                "mobile bill request rejected: {err}"
            );
            MobileBillError::Response(err)
        })
    }
}

/// Chainable builder for one transaction, obtained from [`MobileBillClient::transaction`].
///
/// Builder steps only record fields; nothing is sent until [`Transaction::send`].
pub struct Transaction<'a> {
    client: &'a MobileBillClient,
    fields: RequestFields,
    operation: Option<Operation>,
}

impl Transaction<'_> {
    /// Set the content id and description.
    pub fn content(mut self, id: ContentId, description: ContentDescription) -> Self {
        self.fields.set(ContentId::FIELD, id.as_str());
        self.fields.set(ContentDescription::FIELD, description.as_str());
        self
    }

    /// Set the subscriber number and, optionally, the operator id.
    ///
    /// With `None` the request carries no `OPERATORID` element at all.
    pub fn phone(mut self, msisdn: Msisdn, operator: Option<OperatorId>) -> Self {
        self.fields.set(Msisdn::FIELD, msisdn.as_str());
        if let Some(operator) = operator {
            self.fields.set(OperatorId::FIELD, operator.as_str());
        }
        self
    }

    /// Charge `amount` (minor units) to the subscriber's bill.
    pub fn charge(
        mut self,
        amount: TransactionAmount,
        reference: Reference,
        options: ChargeOptions,
    ) -> Self {
        self.fields.set(TransactionAmount::FIELD, amount.as_str());
        self.fields.set(Reference::FIELD, reference.as_str());
        self.fields.set(Channel::FIELD, options.channel.as_str());
        self.fields.set(CurrencyCode::FIELD, options.currency.as_str());
        self.operation = Some(Operation::ChargeToBill);
        self
    }

    /// Finish building without sending.
    pub fn into_envelope(self) -> Result<RequestEnvelope, MobileBillError> {
        let operation = self.operation.ok_or(ValidationError::MissingOperation)?;
        Ok(RequestEnvelope::for_operation(operation, self.fields))
    }

    /// Send the transaction and classify the reply.
    pub fn send(self) -> Result<ResponseRecord, MobileBillError> {
        let client = self.client;
        let envelope = self.into_envelope()?;
        client.send(envelope)
    }
}
