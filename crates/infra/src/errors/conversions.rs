//! Conversions from external infrastructure errors into domain errors.

use std::error::Error as StdError;

use reqwest::Error as HttpError;
use xui_domain::XuiError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub XuiError);

impl From<InfraError> for XuiError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<XuiError> for InfraError {
    fn from(value: XuiError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoXuiError {
    fn into_xui(self) -> XuiError;
}

/// Render an error with its whole `source()` chain, outermost first.
///
/// reqwest hides the interesting part ("Connection refused", "dns error")
/// one or two levels down.
pub fn describe_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if parts.last().map_or(true, |last| !last.contains(&text)) {
            parts.push(text);
        }
        current = cause.source();
    }
    parts.join(": ")
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → XuiError */
/* -------------------------------------------------------------------------- */

impl IntoXuiError for HttpError {
    fn into_xui(self) -> XuiError {
        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message = status.canonical_reason().unwrap_or("unknown status").to_string();
            return XuiError::Http { status: code, message };
        }

        if self.is_builder() {
            return XuiError::Config(format!("invalid request: {}", describe_chain(&self)));
        }

        XuiError::Transport(describe_chain(&self))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_xui())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → XuiError */
/* -------------------------------------------------------------------------- */

impl IntoXuiError for std::io::Error {
    fn into_xui(self) -> XuiError {
        XuiError::Io(format!("{:?}: {}", self.kind(), self))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_xui())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → XuiError */
/* -------------------------------------------------------------------------- */

impl IntoXuiError for serde_json::Error {
    fn into_xui(self) -> XuiError {
        if self.is_io() {
            XuiError::Io(self.to_string())
        } else {
            XuiError::Serialization(self.to_string())
        }
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_xui())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
