use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Certificate, Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use xui_domain::constants::{BASE_BACKOFF_MS, MAX_ATTEMPTS, REQUEST_TIMEOUT_SECS};
use xui_domain::XuiError;

use crate::errors::{describe_chain, InfraError};
use crate::observability::logger::{default_logger, PanelLogger};

/// Attempt bookkeeping for one dispatched call.
///
/// Attempts are 1-indexed. The delay before attempt `n + 1` is
/// `base_backoff * n`, so the schedule strictly increases as long as the base
/// is non-zero.
#[derive(Debug, Clone)]
pub struct RetryState {
    attempt: usize,
    max_attempts: usize,
    base_backoff: Duration,
    schedule: Vec<Duration>,
}

impl RetryState {
    pub fn new(max_attempts: usize, base_backoff: Duration) -> Self {
        Self { attempt: 0, max_attempts: max_attempts.max(1), base_backoff, schedule: Vec::new() }
    }

    /// Start the next attempt and return its 1-indexed number.
    pub fn begin_attempt(&mut self) -> usize {
        self.attempt += 1;
        self.attempt
    }

    pub fn attempt(&self) -> usize {
        self.attempt
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn has_remaining(&self) -> bool {
        self.attempt < self.max_attempts
    }

    /// Record and return the delay before the next attempt, or `None` once the
    /// budget is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if !self.has_remaining() {
            return None;
        }
        let factor = u32::try_from(self.attempt).unwrap_or(u32::MAX);
        let delay = self.base_backoff.saturating_mul(factor);
        self.schedule.push(delay);
        Some(delay)
    }

    /// Delays applied so far, in order.
    pub fn schedule(&self) -> &[Duration] {
        &self.schedule
    }
}

/// HTTP client with built-in retry and timeout support.
///
/// Only connection-level failures (refused, DNS, timeout) are retried. Any
/// HTTP response, whatever its status, is handed back to the caller.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
    logger: Arc<dyn PanelLogger>,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, XuiError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Execute the provided request builder with retry semantics.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, XuiError> {
        let mut state = RetryState::new(self.max_attempts, self.base_backoff);

        // Builder errors (bad header, bad URL) surface here, before any I/O.
        let template = builder.build().map_err(|err| XuiError::from(InfraError::from(err)))?;

        loop {
            let attempt = state.begin_attempt();
            let max = state.max_attempts();

            let request = template.try_clone().ok_or_else(|| {
                XuiError::Transport(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let method = request.method().clone();
            let url = request.url().clone();
            self.logger.info(&format!("{method} request to {url} (attempt {attempt} of {max})"));
            debug!(attempt, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");
                    return Ok(response);
                }
                Err(err) if is_transient(&err) => {
                    let cause = describe_chain(&err);
                    debug!(attempt, %method, %url, error = %cause, "transient HTTP failure");

                    let Some(delay) = state.next_delay() else {
                        self.logger.warn(&format!(
                            "Request to {url} failed: {cause}, giving up after {attempt} of {max} attempts"
                        ));
                        return Err(XuiError::TransientNetwork { attempts: attempt, message: cause });
                    };

                    self.logger.warn(&format!(
                        "Request to {url} failed: {cause}, retry {attempt} of {max} in {delay:?}"
                    ));
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");
                    return Err(InfraError::from(err).into());
                }
            }
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("max_attempts", &self.max_attempts)
            .field("base_backoff", &self.base_backoff)
            .finish_non_exhaustive()
    }
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    accept_invalid_certs: bool,
    root_certificate: Option<PathBuf>,
    logger: Option<Arc<dyn PanelLogger>>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_attempts: MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(BASE_BACKOFF_MS),
            accept_invalid_certs: false,
            root_certificate: None,
            logger: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// Skip certificate verification (self-signed panels).
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    /// Trust an extra PEM root certificate read from `path` at build time.
    pub fn root_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_certificate = Some(path.into());
        self
    }

    pub fn logger(mut self, logger: Arc<dyn PanelLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn build(self) -> Result<HttpClient, XuiError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(path) = self.root_certificate {
            let pem = std::fs::read(&path).map_err(|err| {
                XuiError::Config(format!("Cannot read CA certificate {}: {}", path.display(), err))
            })?;
            let certificate = Certificate::from_pem(&pem).map_err(|err| {
                XuiError::Config(format!("Invalid CA certificate {}: {}", path.display(), err))
            })?;
            builder = builder.add_root_certificate(certificate);
        }

        let client = builder
            .build()
            .map_err(|err| XuiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
            logger: self.logger.unwrap_or_else(default_logger),
        })
    }
}

/// Connection refused, DNS resolution failure, or timeout.
///
/// TLS handshake and certificate failures also report `is_connect()`; they
/// are not transient, so the source chain is checked for the actual cause.
pub fn is_transient(err: &reqwest::Error) -> bool {
    if err.is_timeout() {
        return true;
    }

    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if matches!(io.kind(), ErrorKind::ConnectionRefused | ErrorKind::TimedOut) {
                return true;
            }
        }
        // hyper-util reports resolver failures as a `ConnectError("dns error")`
        if cause.to_string().contains("dns error") {
            return true;
        }
        source = cause.source();
    }
    false
}
