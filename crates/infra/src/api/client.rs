//! Top-level panel client.
//!
//! One [`XuiApi`] owns one session. The facades it hands out share that
//! session through a common [`Dispatcher`], so logging in once authorises
//! every facade.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};
use xui_domain::constants::{BASE_BACKOFF_MS, MAX_ATTEMPTS, REQUEST_TIMEOUT_SECS};
use xui_domain::{PanelConfig, XuiError};

use super::auth::Credentials;
use super::dispatcher::Dispatcher;
use super::resources::{ClientsApi, DatabaseApi, InboundsApi, ServerApi};
use crate::http::HttpClient;
use crate::observability::logger::{default_logger, PanelLogger};
use crate::session::{ClientSession, SessionStore};

/// Session-aware client for one 3x-ui panel.
#[derive(Debug, Clone)]
pub struct XuiApi {
    dispatcher: Arc<Dispatcher>,
    credentials: Credentials,
}

impl XuiApi {
    /// Client with default logger, timeout and backoff.
    ///
    /// # Errors
    /// Returns `XuiError::Config` if the configuration is invalid or the CA
    /// certificate cannot be loaded.
    pub fn new(config: PanelConfig) -> Result<Self, XuiError> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> XuiApiBuilder {
        XuiApiBuilder::default()
    }

    pub fn clients(&self) -> ClientsApi {
        ClientsApi::new(Arc::clone(&self.dispatcher))
    }

    pub fn inbounds(&self) -> InboundsApi {
        InboundsApi::new(Arc::clone(&self.dispatcher))
    }

    pub fn server(&self) -> ServerApi {
        ServerApi::new(Arc::clone(&self.dispatcher))
    }

    pub fn database(&self) -> DatabaseApi {
        DatabaseApi::new(Arc::clone(&self.dispatcher))
    }

    /// Log in with the configured credentials.
    ///
    /// # Errors
    /// See [`Dispatcher::login`].
    #[instrument(skip(self, two_factor_code))]
    pub async fn login(&self, two_factor_code: Option<&str>) -> Result<ClientSession, XuiError> {
        self.dispatcher.login(&self.credentials, two_factor_code).await
    }

    /// Drop the local session. The panel is not contacted.
    pub fn logout(&self) {
        self.dispatcher.logout();
    }

    /// Active session, if any.
    pub fn session(&self) -> Option<ClientSession> {
        self.dispatcher.session_store().get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.dispatcher.session_store().is_authenticated()
    }

    /// Dispatcher for endpoints not covered by a facade.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

/// Builder for [`XuiApi`].
pub struct XuiApiBuilder {
    config: Option<PanelConfig>,
    logger: Option<Arc<dyn PanelLogger>>,
    base_backoff: Duration,
    timeout: Duration,
    max_attempts: usize,
}

impl Default for XuiApiBuilder {
    fn default() -> Self {
        Self {
            config: None,
            logger: None,
            base_backoff: Duration::from_millis(BASE_BACKOFF_MS),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl XuiApiBuilder {
    pub fn config(mut self, config: PanelConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sink for per-request progress messages. Defaults to `tracing`.
    pub fn logger(mut self, logger: Arc<dyn PanelLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Base of the linear retry backoff.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `XuiError::Config` if no configuration was set, it fails
    /// validation, or the HTTP client cannot be created.
    pub fn build(self) -> Result<XuiApi, XuiError> {
        let config =
            self.config.ok_or_else(|| XuiError::Config("panel configuration not set".into()))?;
        config.validate()?;

        let logger = self.logger.unwrap_or_else(default_logger);

        let mut http = HttpClient::builder()
            .timeout(self.timeout)
            .max_attempts(self.max_attempts)
            .base_backoff(self.base_backoff)
            .accept_invalid_certs(!config.use_tls_verify)
            .logger(Arc::clone(&logger));
        if let Some(path) = &config.custom_certificate_path {
            http = http.root_certificate(path.clone());
        }
        let http = http.build()?;

        debug!(host = %config.host, tls_verify = config.use_tls_verify, "panel client configured");

        let dispatcher =
            Dispatcher::new(http, config.base_url(), Arc::new(SessionStore::new()), logger);

        Ok(XuiApi { dispatcher: Arc::new(dispatcher), credentials: Credentials::from(&config) })
    }
}
