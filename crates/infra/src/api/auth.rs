//! Login handshake and session cookie extraction.

use std::fmt;

use reqwest::header::{HeaderMap, ACCEPT, SET_COOKIE};
use serde::Serialize;
use tracing::{debug, info, instrument};
use xui_domain::constants::{ACCEPT_JSON, LOGIN_ENDPOINT, SESSION_COOKIE_NAMES};
use xui_domain::{PanelConfig, XuiError};

use super::dispatcher::{Dispatcher, RequestOptions, RequestSpec};
use crate::errors::InfraError;
use crate::session::ClientSession;

/// Username, password and optional login secret for one panel account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub login_secret: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into(), login_secret: None }
    }

    #[must_use]
    pub fn with_login_secret(mut self, secret: impl Into<String>) -> Self {
        self.login_secret = Some(secret.into());
        self
    }
}

impl From<&PanelConfig> for Credentials {
    fn from(config: &PanelConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            login_secret: config.token.clone(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("login_secret", &self.login_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    two_factor_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    login_secret: Option<&'a str>,
}

/// Find the session cookie among `Set-Cookie` headers.
///
/// Names in [`SESSION_COOKIE_NAMES`] are tried in order and, for each name,
/// headers are scanned in the order received. The value is everything between
/// the first `=` and the first `;`. Cookies with an empty value (deletions)
/// are skipped.
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<ClientSession> {
    let set_cookies: Vec<&str> =
        headers.get_all(SET_COOKIE).iter().filter_map(|value| value.to_str().ok()).collect();

    for name in SESSION_COOKIE_NAMES {
        let prefix = format!("{name}=");
        for cookie in &set_cookies {
            if !cookie.starts_with(&prefix) {
                continue;
            }
            let pair = cookie.split(';').next().unwrap_or_default();
            let Some((_, value)) = pair.split_once('=') else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            return Some(ClientSession::new(name, value));
        }
    }

    None
}

impl Dispatcher {
    /// Authenticate and store the session cookie issued by the panel.
    ///
    /// A previous session stays in place when the panel rejects the login or
    /// does not issue a recognised cookie.
    ///
    /// # Errors
    /// - `RemoteOperation` when the panel answers `success: false`
    /// - `LoginFailed` when no session cookie is present
    /// - any transport error from [`Dispatcher::execute`]
    #[instrument(skip(self, credentials, two_factor_code), fields(username = %credentials.username))]
    pub async fn login(
        &self,
        credentials: &Credentials,
        two_factor_code: Option<&str>,
    ) -> Result<ClientSession, XuiError> {
        let body = serde_json::to_value(LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
            two_factor_code,
            login_secret: credentials.login_secret.as_deref(),
        })
        .map_err(|err| XuiError::from(InfraError::from(err)))?;

        self.logger().info(&format!("Logging in with username: {}", credentials.username));

        let response = self
            .execute(
                RequestSpec::post(LOGIN_ENDPOINT)
                    .header(ACCEPT.as_str(), ACCEPT_JSON)
                    .json(body)
                    .options(RequestOptions::login()),
            )
            .await?;

        let Some(session) = extract_session_cookie(&response.headers) else {
            debug!(set_cookies = response.set_cookies().len(), "no session cookie in login response");
            return Err(XuiError::LoginFailed(
                "No session cookie found, something wrong with the login...".into(),
            ));
        };

        self.session_store().set(session.cookie_name.clone(), session.value.clone());
        self.logger().info(&format!(
            "Session cookie successfully retrieved for username: {}",
            credentials.username
        ));
        info!(cookie = %session.cookie_name, "panel session established");

        Ok(session)
    }

    /// Forget the current session. No request is sent.
    pub fn logout(&self) {
        self.session_store().clear();
        debug!("panel session cleared");
    }
}
