//! Panel connection configuration

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, XuiError};

/// Everything needed to reach and authenticate against one panel.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PanelConfig {
    /// Base URL, e.g. `https://panel.example.com:2053/secret-path`
    pub host: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Pre-shared login secret sent as `loginSecret`
    #[serde(default)]
    pub token: Option<String>,
    /// Verify the server certificate (disable only for self-signed panels)
    #[serde(default = "default_tls_verify")]
    pub use_tls_verify: bool,
    /// Extra PEM root certificate to trust
    #[serde(default)]
    pub custom_certificate_path: Option<PathBuf>,
}

fn default_tls_verify() -> bool {
    true
}

impl PanelConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            token: None,
            use_tls_verify: true,
            custom_certificate_path: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_tls_verify(mut self, enabled: bool) -> Self {
        self.use_tls_verify = enabled;
        self
    }

    #[must_use]
    pub fn with_custom_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_certificate_path = Some(path.into());
        self
    }

    /// Host with a single trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.host.strip_suffix('/').unwrap_or(&self.host)
    }

    /// Validate configuration
    ///
    /// # Errors
    /// Returns `XuiError::Config` if the host is not an absolute http(s) URL
    /// or the username is empty.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(self.base_url())
            .map_err(|e| XuiError::Config(format!("Invalid host '{}': {}", self.host, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(XuiError::Config(format!(
                "Unsupported scheme '{}' in host, expected http or https",
                parsed.scheme()
            )));
        }

        if self.username.is_empty() {
            return Err(XuiError::Config("username cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl fmt::Debug for PanelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("use_tls_verify", &self.use_tls_verify)
            .field("custom_certificate_path", &self.custom_certificate_path)
            .finish()
    }
}
