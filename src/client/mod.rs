//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use chrono_tz::Tz;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{
    AccountReference, Login, MessageId, MessageKind, MessageState, MessageStatus, MessageText,
    Password, Recipient, Retries, SendMessage, SenderNumber, ValidationError,
};
use crate::transport::{
    DispatchContext, TransportError, decode_dispatch_xml_response,
    decode_message_header_xml_response, dispatch_url, encode_dispatch_xml, message_header_url,
};

const DEFAULT_HOST: &str = "https://api.esendex.com";
const DEFAULT_TIME_ZONE: &str = "Europe/Paris";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Message id returned by [`EsendexClient::send`] in simulate mode.
pub const SIMULATED_MESSAGE_ID: &str = "42";

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

#[derive(Debug, Clone)]
struct Credentials {
    login: Login,
    password: Password,
}

trait HttpTransport: Send + Sync {
    fn post_xml(
        &self,
        url: &str,
        credentials: &Credentials,
        body: String,
    ) -> Result<HttpResponse, BoxError>;

    fn get(&self, url: &str, credentials: &Credentials) -> Result<HttpResponse, BoxError>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_xml(
        &self,
        url: &str,
        credentials: &Credentials,
        body: String,
    ) -> Result<HttpResponse, BoxError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, XML_CONTENT_TYPE)
            .basic_auth(
                credentials.login.as_str(),
                Some(credentials.password.as_str()),
            )
            .body(body.into_bytes())
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }

    fn get(&self, url: &str, credentials: &Credentials) -> Result<HttpResponse, BoxError> {
        let response = self
            .client
            .get(url)
            .basic_auth(
                credentials.login.as_str(),
                Some(credentials.password.as_str()),
            )
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`EsendexClient`].
pub enum EsendexError {
    /// A builder input was missing or malformed. Fix the configuration.
    #[error("configuration error: {0}")]
    Configuration(#[source] ValidationError),

    /// A call argument was rejected before any request was issued.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// Non-successful HTTP status code returned by the gateway.
    #[error("gateway error: HTTP {status}")]
    Gateway { status: u16, body: Option<String> },

    /// The gateway does not know the queried message id (HTTP 404).
    #[error("message not found: {message_id}")]
    NotFound { message_id: MessageId },

    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(#[source] BoxError),

    /// HTTP client / transport failure (DNS, TLS, connection refused, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The outbound request could not be rendered.
    #[error("failed to build request: {0}")]
    Request(#[source] BoxError),

    /// Response body could not be parsed as the expected XML.
    #[error("parse error: {0}")]
    Parse(#[source] BoxError),
}

impl EsendexError {
    /// HTTP status carried by the error, if the gateway answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Gateway { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

fn transport_failure(err: BoxError) -> EsendexError {
    let timed_out = err
        .downcast_ref::<reqwest::Error>()
        .is_some_and(reqwest::Error::is_timeout)
        || err
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::TimedOut);
    if timed_out {
        EsendexError::Timeout(err)
    } else {
        EsendexError::Transport(err)
    }
}

fn request_error(err: TransportError) -> EsendexError {
    EsendexError::Request(Box::new(err))
}

fn parse_error(err: TransportError) -> EsendexError {
    EsendexError::Parse(Box::new(err))
}

fn gateway_error(response: HttpResponse) -> EsendexError {
    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    EsendexError::Gateway {
        status: response.status,
        body,
    }
}

fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}

#[derive(Clone)]
/// Builder for [`EsendexClient`].
///
/// Account, login, password and sender are mandatory; everything else has a default.
/// Inputs are only validated by [`EsendexClientBuilder::build`].
pub struct EsendexClientBuilder {
    account: String,
    login: String,
    password: String,
    sender: String,
    time_zone: Option<String>,
    retries: u32,
    simulate: bool,
    debug_host: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<String>,
}

impl EsendexClientBuilder {
    pub fn new(
        account: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            login: login.into(),
            password: password.into(),
            sender: sender.into(),
            time_zone: None,
            retries: Retries::MIN,
            simulate: false,
            debug_host: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
        }
    }

    /// IANA time zone used for simulated status timestamps (default `Europe/Paris`).
    ///
    /// An empty name keeps the default.
    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    /// Delivery attempts requested from the gateway. Values below 1 are raised to 1.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Suppress all network I/O and return canned results.
    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Send every request to `host` instead of `https://api.esendex.com`.
    ///
    /// An empty host keeps the default.
    pub fn debug_host(mut self, host: impl Into<String>) -> Self {
        self.debug_host = Some(host.into());
        self
    }

    /// Total timeout for a single request (default 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Connect timeout for a single request (default 10 seconds).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validate the configuration and build an [`EsendexClient`].
    ///
    /// Errors:
    /// - [`EsendexError::Configuration`] for any missing or malformed input,
    /// - [`EsendexError::Transport`] if the HTTP client cannot be initialized.
    pub fn build(self) -> Result<EsendexClient, EsendexError> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout);
        if let Some(user_agent) = self.user_agent.as_deref() {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| EsendexError::Transport(Box::new(err)))?;

        self.build_with_transport(Arc::new(ReqwestTransport { client }))
    }

    fn build_with_transport(
        self,
        http: Arc<dyn HttpTransport>,
    ) -> Result<EsendexClient, EsendexError> {
        let account = AccountReference::new(self.account).map_err(EsendexError::Configuration)?;
        let login = Login::new(self.login).map_err(EsendexError::Configuration)?;
        let password = Password::new(self.password).map_err(EsendexError::Configuration)?;
        let sender = SenderNumber::new(self.sender).map_err(EsendexError::Configuration)?;
        let time_zone = parse_time_zone(non_blank(self.time_zone).as_deref())?;
        let host = parse_host(non_blank(self.debug_host).as_deref())?;

        Ok(EsendexClient {
            account,
            credentials: Credentials { login, password },
            sender,
            time_zone,
            retries: Retries::new(self.retries),
            simulate: self.simulate,
            host,
            http,
        })
    }
}

impl fmt::Debug for EsendexClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EsendexClientBuilder")
            .field("account", &self.account)
            .field("login", &self.login)
            .field("sender", &self.sender)
            .field("time_zone", &self.time_zone)
            .field("retries", &self.retries)
            .field("simulate", &self.simulate)
            .field("debug_host", &self.debug_host)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|it| !it.trim().is_empty())
}

fn parse_time_zone(input: Option<&str>) -> Result<Tz, EsendexError> {
    let input = input.unwrap_or(DEFAULT_TIME_ZONE).trim();
    input.parse::<Tz>().map_err(|_| {
        EsendexError::Configuration(ValidationError::InvalidTimeZone {
            input: input.to_owned(),
        })
    })
}

fn parse_host(input: Option<&str>) -> Result<Url, EsendexError> {
    let input = input.unwrap_or(DEFAULT_HOST).trim();
    let invalid = || {
        EsendexError::Configuration(ValidationError::InvalidHost {
            input: input.to_owned(),
        })
    };

    let host = Url::parse(input).map_err(|_| invalid())?;
    if !matches!(host.scheme(), "http" | "https") || host.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(host)
}

#[derive(Clone)]
/// Blocking Esendex client for voice calls and SMS.
///
/// The client only holds immutable configuration and can be shared across threads.
/// Each call performs at most one HTTP round trip; nothing is retried client-side
/// (the configured retry count is a hint forwarded to the gateway).
///
/// In simulate mode no request is ever issued: [`EsendexClient::send`] returns
/// [`SIMULATED_MESSAGE_ID`] and [`EsendexClient::get_status`] reports a delivered message.
pub struct EsendexClient {
    account: AccountReference,
    credentials: Credentials,
    sender: SenderNumber,
    time_zone: Tz,
    retries: Retries,
    simulate: bool,
    host: Url,
    http: Arc<dyn HttpTransport>,
}

impl EsendexClient {
    /// Create a live client with default options.
    ///
    /// For more customization, use [`EsendexClient::builder`].
    pub fn new(
        account: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
        sender: impl Into<String>,
    ) -> Result<Self, EsendexError> {
        EsendexClientBuilder::new(account, login, password, sender).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(
        account: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
        sender: impl Into<String>,
    ) -> EsendexClientBuilder {
        EsendexClientBuilder::new(account, login, password, sender)
    }

    pub fn is_simulated(&self) -> bool {
        self.simulate
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn retries(&self) -> Retries {
        self.retries
    }

    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Send `text` to `recipient` as a voice call or an SMS.
    ///
    /// Errors:
    /// - [`EsendexError::InvalidArgument`] if an SMS is longer than 140 characters,
    /// - [`EsendexError::Gateway`] for non-2xx HTTP responses,
    /// - [`EsendexError::Parse`] if the response carries no `messageheader` id.
    pub fn send(
        &self,
        recipient: Recipient,
        text: MessageText,
        kind: MessageKind,
    ) -> Result<MessageId, EsendexError> {
        let request = SendMessage::new(recipient, text, kind)?;
        let context = DispatchContext {
            account: &self.account,
            sender: &self.sender,
            retries: self.retries,
        };
        let body = encode_dispatch_xml(context, &request).map_err(request_error)?;
        let url = dispatch_url(&self.host).map_err(request_error)?;

        if self.simulate {
            info!(
                url = %url,
                login = self.credentials.login.as_str(),
                request = %body,
                "simulate mode: message dispatch not sent"
            );
            return Ok(MessageId::new(SIMULATED_MESSAGE_ID)?);
        }

        debug!(url = %url, kind = kind.wire_name(), "dispatching message");
        let response = self
            .http
            .post_xml(url.as_str(), &self.credentials, body)
            .map_err(transport_failure)?;
        debug!(status = response.status, "message dispatcher responded");

        if !is_success(response.status) {
            warn!(status = response.status, "message dispatch rejected");
            return Err(gateway_error(response));
        }

        decode_dispatch_xml_response(&response.body).map_err(parse_error)
    }

    /// Query the delivery status of a previously sent message.
    ///
    /// Errors:
    /// - [`EsendexError::NotFound`] if the gateway does not know `message_id`,
    /// - [`EsendexError::Gateway`] for any other non-2xx HTTP response,
    /// - [`EsendexError::Parse`] if the response has no `status` element or an invalid timestamp.
    pub fn get_status(&self, message_id: &MessageId) -> Result<MessageStatus, EsendexError> {
        if self.simulate {
            let now = Utc::now().with_timezone(&self.time_zone).fixed_offset();
            info!(message_id = %message_id, "simulate mode: status query not sent");
            return Ok(MessageStatus::new(MessageState::Delivered, Some(now)));
        }

        let url = message_header_url(&self.host, message_id).map_err(request_error)?;
        debug!(url = %url, "querying message status");
        let response = self
            .http
            .get(url.as_str(), &self.credentials)
            .map_err(transport_failure)?;
        debug!(status = response.status, "message header responded");

        if response.status == 404 {
            return Err(EsendexError::NotFound {
                message_id: message_id.clone(),
            });
        }
        if !is_success(response.status) {
            warn!(status = response.status, message_id = %message_id, "status query rejected");
            return Err(gateway_error(response));
        }

        decode_message_header_xml_response(&response.body).map_err(parse_error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{Offset, TimeZone};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct RecordedCall {
        method: &'static str,
        url: String,
        login: String,
        password: String,
        body: Option<String>,
    }

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        calls: Vec<RecordedCall>,
        outcome: Result<(u16, String), io::ErrorKind>,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self::with_outcome(Ok((response_status, response_body.into())))
        }

        fn failing(kind: io::ErrorKind) -> Self {
            Self::with_outcome(Err(kind))
        }

        fn with_outcome(outcome: Result<(u16, String), io::ErrorKind>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    calls: Vec::new(),
                    outcome,
                })),
            }
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.state.lock().unwrap().calls.clone()
        }

        fn record(
            &self,
            method: &'static str,
            url: &str,
            credentials: &Credentials,
            body: Option<String>,
        ) -> Result<HttpResponse, BoxError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(RecordedCall {
                method,
                url: url.to_owned(),
                login: credentials.login.as_str().to_owned(),
                password: credentials.password.as_str().to_owned(),
                body,
            });
            match &state.outcome {
                Ok((status, body)) => Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                }),
                Err(kind) => Err(Box::new(io::Error::new(*kind, "fake transport failure"))),
            }
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_xml(
            &self,
            url: &str,
            credentials: &Credentials,
            body: String,
        ) -> Result<HttpResponse, BoxError> {
            self.record("POST", url, credentials, Some(body))
        }

        fn get(&self, url: &str, credentials: &Credentials) -> Result<HttpResponse, BoxError> {
            self.record("GET", url, credentials, None)
        }
    }

    const DISPATCH_OK: &str = r#"<?xml version="1.0" encoding="utf-8"?>
        <messageheaders batchid="F8BF9867-FF81-49E4-ACC5-774DE793B776" xmlns="http://api.esendex.com/ns/">
          <messageheader uri="https://api.esendex.com/v1.0/MessageHeaders/ABC123" id="ABC123" />
        </messageheaders>"#;

    fn header_response(status: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
            <messageheader id="ABC123" xmlns="http://api.esendex.com/ns/">
              <status>{status}</status>
              <laststatusat>2024-03-01T09:00:05.000Z</laststatusat>
            </messageheader>"#
        )
    }

    fn builder() -> EsendexClientBuilder {
        EsendexClient::builder("EX0123456", "user@example.com", "secret", "06 12 34 56 78")
            .debug_host("https://example.invalid")
    }

    fn make_client(transport: FakeTransport) -> EsendexClient {
        builder()
            .build_with_transport(Arc::new(transport))
            .unwrap()
    }

    fn make_simulated_client(transport: FakeTransport) -> EsendexClient {
        builder()
            .simulate(true)
            .build_with_transport(Arc::new(transport))
            .unwrap()
    }

    fn recipient() -> Recipient {
        Recipient::new("06 98 76 54 32").unwrap()
    }

    #[test]
    fn build_rejects_missing_mandatory_fields() {
        let cases = [
            ("", "user", "pass", "06 12 34 56 78", AccountReference::FIELD),
            ("EX1", "", "pass", "06 12 34 56 78", Login::FIELD),
            ("EX1", "user", "", "06 12 34 56 78", Password::FIELD),
            ("EX1", "user", "pass", "", SenderNumber::FIELD),
        ];
        for (account, login, password, sender, field) in cases {
            let err = EsendexClient::builder(account, login, password, sender)
                .build_with_transport(Arc::new(FakeTransport::new(200, "")))
                .err()
                .unwrap();
            match err {
                EsendexError::Configuration(ValidationError::Empty { field: actual }) => {
                    assert_eq!(actual, field)
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn build_rejects_malformed_sender() {
        let err = EsendexClient::builder("EX1", "user", "pass", "+33 6 12 34 56 78")
            .build_with_transport(Arc::new(FakeTransport::new(200, "")))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            EsendexError::Configuration(ValidationError::InvalidSenderNumber { .. })
        ));
    }

    #[test]
    fn build_applies_defaults() {
        let client = EsendexClient::builder("EX1", "user", "pass", "0612345678")
            .build_with_transport(Arc::new(FakeTransport::new(200, "")))
            .unwrap();
        assert_eq!(client.time_zone(), chrono_tz::Europe::Paris);
        assert_eq!(client.host().as_str(), "https://api.esendex.com/");
        assert_eq!(client.retries().get(), 1);
        assert!(!client.is_simulated());
    }

    #[test]
    fn build_clamps_retries_and_ignores_blank_overrides() {
        let client = EsendexClient::builder("EX1", "user", "pass", "0612345678")
            .retries(0)
            .time_zone("")
            .debug_host("  ")
            .build_with_transport(Arc::new(FakeTransport::new(200, "")))
            .unwrap();
        assert_eq!(client.retries().get(), 1);
        assert_eq!(client.time_zone(), chrono_tz::Europe::Paris);
        assert_eq!(client.host().as_str(), "https://api.esendex.com/");
    }

    #[test]
    fn build_rejects_unknown_time_zone_and_bad_host() {
        let err = builder()
            .time_zone("Mars/Olympus_Mons")
            .build_with_transport(Arc::new(FakeTransport::new(200, "")))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            EsendexError::Configuration(ValidationError::InvalidTimeZone { .. })
        ));

        for host in ["not a url", "ftp://example.com", "mailto:ops@example.com"] {
            let err = builder()
                .debug_host(host)
                .build_with_transport(Arc::new(FakeTransport::new(200, "")))
                .err()
                .unwrap();
            assert!(matches!(
                err,
                EsendexError::Configuration(ValidationError::InvalidHost { .. })
            ));
        }
    }

    #[test]
    fn reqwest_backed_build_succeeds() {
        let client = EsendexClient::builder("EX1", "user", "pass", "06 12 34 56 78")
            .timeout(Duration::from_secs(5))
            .user_agent("esendex-tests")
            .build()
            .unwrap();
        assert_eq!(client.host().as_str(), "https://api.esendex.com/");
    }

    #[test]
    fn send_posts_rendered_request_and_returns_header_id() {
        let transport = FakeTransport::new(200, DISPATCH_OK);
        let client = make_client(transport.clone());

        let id = client
            .send(
                recipient(),
                MessageText::new("Alarme niveau 2"),
                MessageKind::Voice,
            )
            .unwrap();
        assert_eq!(id.as_str(), "ABC123");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.method, "POST");
        assert_eq!(call.url, "https://example.invalid/v1.0/messagedispatcher");
        assert_eq!(call.login, "user@example.com");
        assert_eq!(call.password, "secret");

        let body = call.body.as_deref().unwrap();
        assert!(body.contains("<accountreference>EX0123456</accountreference>"));
        assert!(body.contains("<from>06 12 34 56 78</from>"));
        assert!(body.contains("<to>06 98 76 54 32</to>"));
        assert!(body.contains("<type>Voice</type>"));
        assert!(body.contains("<body>Alarme niveau 2</body>"));
        assert!(body.contains("<lang>fr-FR</lang>"));
        assert!(body.contains("<retries>1</retries>"));
    }

    #[test]
    fn padded_credentials_reach_the_gateway_unchanged() {
        let transport = FakeTransport::new(200, DISPATCH_OK);
        let client = EsendexClient::builder(" EX1 ", " user ", "pw", "0612345678")
            .build_with_transport(Arc::new(transport.clone()))
            .unwrap();

        client
            .send(recipient(), MessageText::new("hi"), MessageKind::Voice)
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].login, " user ");
        assert!(
            calls[0]
                .body
                .as_deref()
                .unwrap()
                .contains("<accountreference> EX1 </accountreference>")
        );
    }

    #[test]
    fn build_accepts_whitespace_only_account_and_login() {
        let client = EsendexClient::builder("   ", "   ", "pw", "0612345678")
            .build_with_transport(Arc::new(FakeTransport::new(200, "")))
            .unwrap();
        assert_eq!(client.retries().get(), 1);
    }

    #[test]
    fn send_accepts_blank_body() {
        let transport = FakeTransport::new(200, DISPATCH_OK);
        let client = make_client(transport.clone());

        let id = client
            .send(recipient(), MessageText::new("   "), MessageKind::Voice)
            .unwrap();
        assert_eq!(id.as_str(), "ABC123");
        assert!(
            transport.calls()[0]
                .body
                .as_deref()
                .unwrap()
                .contains("<body>   </body>")
        );
    }

    #[test]
    fn request_rendering_failure_is_a_request_error() {
        let err = request_error(TransportError::InvalidBaseUrl {
            url: "mailto:ops@example.com".to_owned(),
        });
        assert!(matches!(err, EsendexError::Request(_)));
        assert_eq!(err.http_status(), None);
        assert!(err.to_string().starts_with("failed to build request:"));
    }

    #[test]
    fn send_accepts_sms_at_length_limit() {
        let transport = FakeTransport::new(200, DISPATCH_OK);
        let client = make_client(transport.clone());

        let text = MessageText::new("x".repeat(140));
        let id = client.send(recipient(), text, MessageKind::Sms).unwrap();
        assert_eq!(id.as_str(), "ABC123");
        assert!(
            transport.calls()[0]
                .body
                .as_deref()
                .unwrap()
                .contains("<type>SMS</type>")
        );
    }

    #[test]
    fn send_rejects_oversized_sms_without_network_call() {
        let transport = FakeTransport::new(200, DISPATCH_OK);
        let client = make_client(transport.clone());

        let text = MessageText::new("x".repeat(141));
        let err = client.send(recipient(), text, MessageKind::Sms).unwrap_err();
        assert!(matches!(
            err,
            EsendexError::InvalidArgument(ValidationError::MessageTooLong {
                max: 140,
                actual: 141
            })
        ));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn unknown_message_kind_is_an_invalid_argument() {
        let err: EsendexError = "fax".parse::<MessageKind>().unwrap_err().into();
        assert!(matches!(
            err,
            EsendexError::InvalidArgument(ValidationError::UnknownMessageKind { .. })
        ));
    }

    #[test]
    fn send_in_simulate_mode_returns_placeholder_without_network_call() {
        let transport = FakeTransport::new(500, "must not be used");
        let client = make_simulated_client(transport.clone());

        let id = client
            .send(
                recipient(),
                MessageText::new("hello"),
                MessageKind::Sms,
            )
            .unwrap();
        assert_eq!(id.as_str(), SIMULATED_MESSAGE_ID);
        assert_eq!(id.as_str(), "42");
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn send_maps_non_success_http_status() {
        let transport = FakeTransport::new(401, "Unauthorized");
        let client = make_client(transport);

        let err = client
            .send(recipient(), MessageText::new("hi"), MessageKind::Voice)
            .unwrap_err();
        match err {
            EsendexError::Gateway { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body.as_deref(), Some("Unauthorized"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn send_maps_empty_http_body_to_none() {
        let transport = FakeTransport::new(503, "   ");
        let client = make_client(transport);

        let err = client
            .send(recipient(), MessageText::new("hi"), MessageKind::Voice)
            .unwrap_err();
        assert!(matches!(
            err,
            EsendexError::Gateway {
                status: 503,
                body: None
            }
        ));
        assert_eq!(err.http_status(), Some(503));
    }

    #[test]
    fn send_maps_unexpected_body_to_parse_error() {
        let transport = FakeTransport::new(200, "<html>maintenance</html>");
        let client = make_client(transport);

        let err = client
            .send(recipient(), MessageText::new("hi"), MessageKind::Voice)
            .unwrap_err();
        assert!(matches!(err, EsendexError::Parse(_)));
    }

    #[test]
    fn transport_timeout_is_distinct_from_other_failures() {
        let client = make_client(FakeTransport::failing(io::ErrorKind::TimedOut));
        let err = client
            .send(recipient(), MessageText::new("hi"), MessageKind::Voice)
            .unwrap_err();
        assert!(matches!(err, EsendexError::Timeout(_)));

        let client = make_client(FakeTransport::failing(io::ErrorKind::ConnectionRefused));
        let err = client
            .get_status(&MessageId::new("ABC123").unwrap())
            .unwrap_err();
        assert!(matches!(err, EsendexError::Transport(_)));
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn get_status_uses_message_header_endpoint() {
        let transport = FakeTransport::new(200, header_response("Delivered"));
        let client = make_client(transport.clone());

        let status = client
            .get_status(&MessageId::new("ABC123").unwrap())
            .unwrap();
        assert_eq!(status.state, MessageState::Delivered);
        assert_eq!(
            status.updated_at,
            Some(
                Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 5)
                    .unwrap()
                    .fixed_offset()
            )
        );

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].url, "https://example.invalid/v1.0/messageheaders/ABC123");
        assert_eq!(calls[0].login, "user@example.com");
        assert_eq!(calls[0].body, None);
    }

    #[test]
    fn get_status_maps_status_vocabulary() {
        for (raw, expected) in [
            ("Failed Authorisation", MessageState::Failed),
            ("Acknowledged", MessageState::Acknowledged),
            ("foo", MessageState::Unknown),
        ] {
            let client = make_client(FakeTransport::new(200, header_response(raw)));
            let status = client
                .get_status(&MessageId::new("ABC123").unwrap())
                .unwrap();
            assert_eq!(status.state, expected, "status {raw}");
        }
    }

    #[test]
    fn get_status_maps_404_to_not_found() {
        let client = make_client(FakeTransport::new(404, ""));

        let err = client
            .get_status(&MessageId::new("missing-id").unwrap())
            .unwrap_err();
        match err {
            EsendexError::NotFound { message_id } => assert_eq!(message_id.as_str(), "missing-id"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn get_status_maps_other_failures_to_gateway_error() {
        let client = make_client(FakeTransport::new(500, "boom"));

        let err = client
            .get_status(&MessageId::new("ABC123").unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            EsendexError::Gateway {
                status: 500,
                body: Some(_)
            }
        ));
    }

    #[test]
    fn get_status_in_simulate_mode_reports_delivered_now_in_time_zone() {
        let transport = FakeTransport::new(500, "must not be used");
        let client = builder()
            .simulate(true)
            .time_zone("America/New_York")
            .build_with_transport(Arc::new(transport.clone()))
            .unwrap();

        let status = client
            .get_status(&MessageId::new("42").unwrap())
            .unwrap();
        assert_eq!(status.state, MessageState::Delivered);

        let at = status.updated_at.unwrap();
        let expected_offset = chrono_tz::America::New_York
            .offset_from_utc_datetime(&at.naive_utc())
            .fix();
        assert_eq!(*at.offset(), expected_offset);
        assert!((Utc::now() - at.with_timezone(&Utc)).num_seconds().abs() < 60);
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn simulated_client_uses_default_time_zone() {
        let client = make_simulated_client(FakeTransport::new(200, ""));
        let status = client
            .get_status(&MessageId::new("42").unwrap())
            .unwrap();

        let at = status.updated_at.unwrap();
        let expected_offset = chrono_tz::Europe::Paris
            .offset_from_utc_datetime(&at.naive_utc())
            .fix();
        assert_eq!(*at.offset(), expected_offset);
    }
}
