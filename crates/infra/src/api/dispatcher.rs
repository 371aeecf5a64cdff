//! Single entry point for every panel call.
//!
//! The dispatcher owns the session gate, URL composition, cookie attachment,
//! and the split between envelope and raw responses. Transport-level retry is
//! delegated to [`HttpClient`].

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, COOKIE, SET_COOKIE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};
use xui_domain::{ResponseEnvelope, XuiError};

use super::validator::validate_envelope;
use crate::errors::InfraError;
use crate::http::HttpClient;
use crate::observability::PanelLogger;
use crate::session::SessionStore;

/// Verbs the panel API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMethod {
    Get,
    Post,
}

impl PanelMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for PanelMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PanelMethod> for Method {
    fn from(value: PanelMethod) -> Self {
        match value {
            PanelMethod::Get => Method::GET,
            PanelMethod::Post => Method::POST,
        }
    }
}

/// Per-call behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Refuse to send without an active session.
    pub require_session: bool,
    /// Return the body as bytes without envelope decoding or validation.
    pub skip_validation: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { require_session: true, skip_validation: false }
    }
}

impl RequestOptions {
    /// Options for the login call, the only one allowed without a session.
    pub fn login() -> Self {
        Self { require_session: false, ..Self::default() }
    }

    /// Options for binary downloads.
    pub fn raw() -> Self {
        Self { skip_validation: true, ..Self::default() }
    }
}

/// Description of one panel call.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: PanelMethod,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<Value>,
    options: RequestOptions,
}

impl RequestSpec {
    pub fn new(method: PanelMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(PanelMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(PanelMethod::Post, path)
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn accept(self, value: &str) -> Self {
        self.header(ACCEPT.as_str(), value)
    }

    /// JSON body. Ignored for GET.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn method(&self) -> PanelMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn request_options(&self) -> RequestOptions {
        self.options
    }
}

/// Body of a dispatched call.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Decoded and validated `{success, msg, obj}` wrapper.
    Envelope(ResponseEnvelope),
    /// Undecoded bytes, for `skip_validation` calls.
    Raw(Vec<u8>),
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone)]
pub struct PanelResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl PanelResponse {
    pub fn envelope(&self) -> Option<&ResponseEnvelope> {
        match &self.body {
            ResponseBody::Envelope(envelope) => Some(envelope),
            ResponseBody::Raw(_) => None,
        }
    }

    /// # Errors
    /// Returns `XuiError::InvalidResponse` for raw responses.
    pub fn into_envelope(self) -> Result<ResponseEnvelope, XuiError> {
        match self.body {
            ResponseBody::Envelope(envelope) => Ok(envelope),
            ResponseBody::Raw(_) => {
                Err(XuiError::InvalidResponse("expected a JSON envelope, got raw bytes".into()))
            }
        }
    }

    /// # Errors
    /// Returns `XuiError::InvalidResponse` for envelope responses.
    pub fn into_bytes(self) -> Result<Vec<u8>, XuiError> {
        match self.body {
            ResponseBody::Raw(bytes) => Ok(bytes),
            ResponseBody::Envelope(_) => {
                Err(XuiError::InvalidResponse("expected raw bytes, got a JSON envelope".into()))
            }
        }
    }

    /// All `Set-Cookie` header values that are valid UTF-8, in order.
    pub fn set_cookies(&self) -> Vec<&str> {
        self.headers.get_all(SET_COOKIE).iter().filter_map(|value| value.to_str().ok()).collect()
    }
}

/// Sends [`RequestSpec`]s to one panel on behalf of one session.
pub struct Dispatcher {
    http: HttpClient,
    base_url: String,
    store: Arc<SessionStore>,
    logger: Arc<dyn PanelLogger>,
}

impl Dispatcher {
    /// `base_url` loses one trailing slash, if present.
    pub fn new(
        http: HttpClient,
        base_url: impl Into<String>,
        store: Arc<SessionStore>,
        logger: Arc<dyn PanelLogger>,
    ) -> Self {
        let mut base_url = base_url.into();
        if base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url, store, logger }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn logger(&self) -> &Arc<dyn PanelLogger> {
        &self.logger
    }

    /// Absolute URL for a panel path. A leading `/` on `path` is dropped.
    pub fn url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url, path)
    }

    /// Send one call and return its decoded response.
    ///
    /// # Errors
    /// - `AuthRequired` when the call needs a session and none is stored; no
    ///   request is made.
    /// - `Config` for a header name or value that cannot be sent; no request
    ///   is made.
    /// - `TransientNetwork` once the retry budget is exhausted.
    /// - `Transport` / `Config` for non-retryable transport failures.
    /// - `Http` for a non-2xx status whose body is not an envelope (or any
    ///   non-2xx status on a raw call).
    /// - `InvalidResponse` for a 2xx body that is not an envelope.
    /// - `RemoteOperation` when the envelope reports `success: false`.
    #[instrument(skip(self, spec), fields(method = %spec.method, path = %spec.path))]
    pub async fn execute(&self, spec: RequestSpec) -> Result<PanelResponse, XuiError> {
        let session = self.store.get();
        if spec.options.require_session && session.is_none() {
            debug!("refusing to send without a session");
            return Err(XuiError::AuthRequired);
        }

        let url = self.url(&spec.path);
        let mut builder = self.http.request(spec.method.into(), &url);

        for (name, value) in &spec.headers {
            let (name, value) = parse_header(name, value)?;
            builder = builder.header(name, value);
        }

        if let Some(session) = &session {
            builder = builder.header(COOKIE, session.header_value());
        }

        if let (PanelMethod::Post, Some(body)) = (spec.method, &spec.body) {
            builder = builder.json(body);
        }

        let response = self.http.send(builder).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(|err| XuiError::from(InfraError::from(err)))?;

        debug!(status = status.as_u16(), len = bytes.len(), "panel responded");

        if spec.options.skip_validation {
            if !status.is_success() {
                return Err(status_error(spec.method, &url, status));
            }
            return Ok(PanelResponse {
                status: status.as_u16(),
                headers,
                body: ResponseBody::Raw(bytes.to_vec()),
            });
        }

        let envelope = match serde_json::from_slice::<ResponseEnvelope>(&bytes) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(status_error(spec.method, &url, status)),
            Err(err) => {
                return Err(XuiError::InvalidResponse(format!(
                    "{} {} returned a body that is not a panel envelope: {}",
                    spec.method, url, err
                )));
            }
        };

        validate_envelope(&envelope)?;

        Ok(PanelResponse { status: status.as_u16(), headers, body: ResponseBody::Envelope(envelope) })
    }

    /// [`execute`](Self::execute) and unwrap the envelope.
    pub async fn envelope(&self, spec: RequestSpec) -> Result<ResponseEnvelope, XuiError> {
        self.execute(spec).await?.into_envelope()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("http", &self.http)
            .field("authenticated", &self.store.is_authenticated())
            .finish_non_exhaustive()
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), XuiError> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|err| XuiError::Config(format!("Invalid header name '{name}': {err}")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|err| XuiError::Config(format!("Invalid value for header '{name}': {err}")))?;
    Ok((header_name, header_value))
}

fn status_error(method: PanelMethod, url: &str, status: StatusCode) -> XuiError {
    XuiError::Http { status: status.as_u16(), message: format!("{method} {url} returned {status}") }
}
